//! Network input tables.
//!
//! A [`Network`] holds one row table per element category, addressed by
//! the row `index`. It is deserialized with serde from whatever format the
//! caller reads (the CLI uses TOML) and turned into a [`Diagram`] by
//! [`Network::build_diagram`].
//!
//! ```toml
//! [[bus]]
//! index = 0
//! name = "Substation 110 kV"
//! geo = { x = 0.0, y = 10.0 }
//!
//! [[line]]
//! index = 0
//! from_bus = 0
//! to_bus = 1
//! std_type = "AC-120"
//! length_km = 12.5
//! ```

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::Deserialize;

use oneline_core::geometry::Point;

use crate::{
    OnelineError,
    config::AppConfig,
    diagram::Diagram,
    identifier::{
        BusId, ElementKey, ExtGridId, GenId, ImpedanceId, LineId, ShuntId, SwitchId, Trafo3wId,
        TrafoId,
    },
    symbol::{
        BusSymbol, Busbar, LineSpec, LineStyle, Node, SwitchSpec, Transformer3wSpec,
        TransformerSpec, TransformerStyle,
    },
};

fn in_service_default() -> bool {
    true
}

fn closed_default() -> bool {
    true
}

fn parallel_default() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    /// Rated voltage
    pub vn_kv: Option<f64>,
    /// Position of a bus drawn as a node, or left end of a busbar
    pub geo: Option<Point>,
    /// Explicit busbar ends, overriding the computed busbar
    pub busbar: Option<[Point; 2]>,
    /// Explicit label anchor
    pub label_at: Option<Point>,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
    /// Initial symmetrical short-circuit current from a short-circuit study
    pub ikss_ka: Option<f64>,
    /// Voltage magnitude from a load flow
    pub vm_pu: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub from_bus: usize,
    pub to_bus: usize,
    #[serde(default)]
    pub std_type: String,
    #[serde(default)]
    pub length_km: f64,
    #[serde(default = "parallel_default")]
    pub parallel: u32,
    #[serde(default)]
    pub r_ohm_per_km: f64,
    #[serde(default)]
    pub x_ohm_per_km: f64,
    /// Waypoints between the two buses
    #[serde(default)]
    pub geo: Vec<Point>,
    pub label_at: Option<Point>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub bus: usize,
    pub element: usize,
    /// Element type: `b`, `l`, `t` or `t3`
    pub et: String,
    #[serde(default = "closed_default")]
    pub closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrafoRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub hv_bus: usize,
    pub lv_bus: usize,
    #[serde(default)]
    pub std_type: String,
    pub sn_mva: Option<f64>,
    pub vector_group: Option<String>,
    /// Series resistance referred to the HV side
    pub r_ohm: Option<f64>,
    /// Series reactance referred to the HV side
    pub x_ohm: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trafo3wRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub hv_bus: usize,
    pub mv_bus: usize,
    pub lv_bus: usize,
    #[serde(default)]
    pub std_type: String,
    pub vector_group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub bus: usize,
    pub p_mw: Option<f64>,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtGridRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub bus: usize,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
    /// Short-circuit impedance at maximum infeed
    pub r_max_ohm: Option<f64>,
    pub x_max_ohm: Option<f64>,
    /// Short-circuit impedance at minimum infeed
    pub r_min_ohm: Option<f64>,
    pub x_min_ohm: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShuntRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub bus: usize,
    #[serde(default)]
    pub p_mw: f64,
    #[serde(default)]
    pub q_mvar: f64,
    #[serde(default = "in_service_default")]
    pub in_service: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImpedanceRow {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    pub from_bus: usize,
    pub to_bus: usize,
}

/// Element tables of a power network.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Network {
    pub bus: Vec<BusRow>,
    pub line: Vec<LineRow>,
    pub switch: Vec<SwitchRow>,
    pub trafo: Vec<TrafoRow>,
    pub trafo3w: Vec<Trafo3wRow>,
    #[serde(rename = "gen")]
    pub generator: Vec<GenRow>,
    pub ext_grid: Vec<ExtGridRow>,
    pub shunt: Vec<ShuntRow>,
    pub impedance: Vec<ImpedanceRow>,
}

/// Keeps the non-empty rows of a label
fn label_rows(rows: impl IntoIterator<Item = String>) -> Vec<String> {
    rows.into_iter().filter(|row| !row.is_empty()).collect()
}

/// `r+jx Ohm` when both parts are known
fn complex_ohm(r: Option<f64>, x: Option<f64>) -> String {
    match (r, x) {
        (Some(r), Some(x)) => format!("{r:.3}+j{x:.3} Ohm"),
        _ => String::new(),
    }
}

/// `Zname=r+jx = |z| Ohm` when both parts are known
fn named_impedance(name: &str, r: Option<f64>, x: Option<f64>) -> String {
    match (r, x) {
        (Some(r), Some(x)) => format!("{name}={r:.3}+j{x:.3} = {:.3} Ohm", r.hypot(x)),
        _ => String::new(),
    }
}

impl Network {
    /// Number of elements attached to each bus, bus-to-bus switches excluded.
    pub fn incident_counts(&self) -> HashMap<usize, usize> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        let ends = self
            .line
            .iter()
            .flat_map(|row| [row.from_bus, row.to_bus])
            .chain(self.trafo.iter().flat_map(|row| [row.hv_bus, row.lv_bus]))
            .chain(
                self.trafo3w
                    .iter()
                    .flat_map(|row| [row.hv_bus, row.mv_bus, row.lv_bus]),
            )
            .chain(self.impedance.iter().flat_map(|row| [row.from_bus, row.to_bus]))
            .chain(self.generator.iter().map(|row| row.bus))
            .chain(self.ext_grid.iter().map(|row| row.bus))
            .chain(self.shunt.iter().map(|row| row.bus));
        for bus in ends {
            *counts.entry(bus).or_default() += 1;
        }
        counts
    }

    /// Builds a diagram from the tables.
    ///
    /// Buses with more incident elements than the configured threshold are
    /// drawn as busbars. Symbols are registered in dependency order,
    /// switches last. Out-of-service generators, external grids and shunts
    /// are skipped.
    ///
    /// # Errors
    ///
    /// - [`OnelineError::MissingCoordinate`] if a bus has no position
    /// - [`OnelineError::Network`] for an unknown switch element type
    /// - any error raised while registering a symbol
    pub fn build_diagram(&self, config: &AppConfig) -> Result<Diagram, OnelineError> {
        info!(
            buses = self.bus.len(),
            lines = self.line.len(),
            switches = self.switch.len();
            "Building diagram from network tables"
        );
        let mut diagram = Diagram::new(config.layout.clone());

        self.add_buses(&mut diagram, config)?;
        self.add_branches(&mut diagram, config)?;
        self.add_bus_devices(&mut diagram, config)?;
        self.add_switches(&mut diagram)?;

        info!(symbols = diagram.len(); "Diagram built");
        Ok(diagram)
    }

    fn add_buses(&self, diagram: &mut Diagram, config: &AppConfig) -> Result<(), OnelineError> {
        let counts = self.incident_counts();
        let layout = &config.layout;
        let labels = &config.labels;

        for row in &self.bus {
            let id = BusId::new(row.index);
            if !row.in_service {
                debug!(bus = row.index; "Bus is out of service");
            }

            let text = label_rows([
                row.name.clone(),
                row.ikss_ka
                    .filter(|_| labels.short_circuit)
                    .map(|ikss| format!("Ik={ikss:.2} kA"))
                    .unwrap_or_default(),
                row.vm_pu
                    .filter(|_| labels.voltage)
                    .map(|vm| format!("V={vm:.4}"))
                    .unwrap_or_default(),
                if labels.indexes {
                    format!("({})", row.index)
                } else {
                    String::new()
                },
            ]);

            let count = counts.get(&row.index).copied().unwrap_or_default();
            let symbol = match (row.busbar, row.geo) {
                (Some([start, end]), _) => {
                    BusSymbol::Busbar(Busbar::new(id, start, end, text, layout))
                }
                (None, Some(geo)) if count > layout.busbar_threshold => {
                    debug!(bus = row.index, connections = count; "Drawing bus as busbar");
                    let length = layout.busbar_pitch * (count - 1) as f32;
                    let end = geo.add_point(Point::new(length, 0.0));
                    BusSymbol::Busbar(Busbar::new(id, geo, end, text, layout))
                }
                (None, Some(geo)) => BusSymbol::Node(Node::new(id, geo, text, layout)),
                (None, None) => return Err(OnelineError::MissingCoordinate { bus: id }),
            };

            let symbol = match row.label_at {
                Some(anchor) => symbol.with_label_anchor(anchor),
                None => symbol,
            };
            diagram.insert_bus(symbol)?;
        }
        Ok(())
    }

    fn add_branches(
        &self,
        diagram: &mut Diagram,
        config: &AppConfig,
    ) -> Result<(), OnelineError> {
        let impedance_mode = config.labels.line_impedance;

        for row in &self.line {
            let text = if impedance_mode {
                let length = row.length_km / f64::from(row.parallel.max(1));
                format!(
                    "{:.3}+j{:.3} Ohm",
                    row.r_ohm_per_km * length,
                    row.x_ohm_per_km * length
                )
            } else if row.parallel > 1 {
                format!("{}*{} {} km", row.parallel, row.std_type, row.length_km)
            } else {
                format!("{} {} km", row.std_type, row.length_km)
            };
            let style = if impedance_mode {
                LineStyle::Impedance
            } else {
                LineStyle::Plain
            };

            let mut spec = LineSpec::new(BusId::new(row.from_bus), BusId::new(row.to_bus))
                .with_text(text.trim())
                .with_waypoints(row.geo.clone())
                .with_style(style);
            if let Some(anchor) = row.label_at {
                spec = spec.with_label_anchor(anchor);
            }
            diagram.add_line(LineId::new(row.index), spec)?;
        }

        for row in &self.trafo {
            let spec = TransformerSpec::new(BusId::new(row.hv_bus), BusId::new(row.lv_bus));
            let mut spec = if impedance_mode {
                spec.with_style(TransformerStyle::Impedance)
                    .with_text(label_rows([row.name.clone(), complex_ohm(row.r_ohm, row.x_ohm)]))
            } else {
                spec.with_text(label_rows([
                    row.name.clone(),
                    row.std_type.clone(),
                    row.sn_mva.map(|sn| format!("{sn} MVA")).unwrap_or_default(),
                ]))
            };
            if let Some(code) = &row.vector_group {
                spec = spec.with_vector_group(code.as_str());
            }
            diagram.add_trafo(TrafoId::new(row.index), spec)?;
        }

        for row in &self.trafo3w {
            let mut spec = Transformer3wSpec::new(
                BusId::new(row.hv_bus),
                BusId::new(row.mv_bus),
                BusId::new(row.lv_bus),
            )
            .with_text(label_rows([row.name.clone(), row.std_type.clone()]));
            if let Some(code) = &row.vector_group {
                spec = spec.with_vector_group(code.as_str());
            }
            diagram.add_trafo3w(Trafo3wId::new(row.index), spec)?;
        }

        for row in &self.impedance {
            diagram.add_impedance(
                ImpedanceId::new(row.index),
                BusId::new(row.from_bus),
                BusId::new(row.to_bus),
                label_rows([row.name.clone()]),
            )?;
        }
        Ok(())
    }

    fn add_bus_devices(
        &self,
        diagram: &mut Diagram,
        config: &AppConfig,
    ) -> Result<(), OnelineError> {
        for row in &self.generator {
            if !row.in_service {
                warn!(generator = row.index; "Skipping out-of-service generator");
                continue;
            }
            let text = label_rows([
                row.name.clone(),
                row.p_mw.map(|p| format!("{p} MW")).unwrap_or_default(),
            ]);
            diagram.add_gen(GenId::new(row.index), BusId::new(row.bus), text)?;
        }

        for row in &self.ext_grid {
            if !row.in_service {
                warn!(ext_grid = row.index; "Skipping out-of-service external grid");
                continue;
            }
            let (id, bus) = (ExtGridId::new(row.index), BusId::new(row.bus));
            if config.labels.line_impedance {
                let text = label_rows([
                    row.name.clone(),
                    named_impedance("Zmax", row.r_max_ohm, row.x_max_ohm),
                    named_impedance("Zmin", row.r_min_ohm, row.x_min_ohm),
                ]);
                diagram.add_ext_grid_behind_impedance(id, bus, text)?;
            } else {
                diagram.add_ext_grid(id, bus, label_rows([row.name.clone()]))?;
            }
        }

        let voltages: HashMap<usize, f64> = self
            .bus
            .iter()
            .filter_map(|bus| bus.vn_kv.map(|vn| (bus.index, vn)))
            .collect();
        for row in &self.shunt {
            if !row.in_service {
                warn!(shunt = row.index; "Skipping out-of-service shunt");
                continue;
            }
            let (r, x) = match voltages.get(&row.bus).copied() {
                Some(vn) => (
                    (row.p_mw != 0.0)
                        .then(|| format!("r={:.4}", vn * vn / row.p_mw))
                        .unwrap_or_default(),
                    (row.q_mvar != 0.0)
                        .then(|| format!("x={:.4}", vn * vn / row.q_mvar))
                        .unwrap_or_default(),
                ),
                None => (String::new(), String::new()),
            };
            diagram.add_shunt(
                ShuntId::new(row.index),
                BusId::new(row.bus),
                row.q_mvar,
                label_rows([row.name.clone(), r, x]),
            )?;
        }
        Ok(())
    }

    fn add_switches(&self, diagram: &mut Diagram) -> Result<(), OnelineError> {
        for row in &self.switch {
            let element = ElementKey::from_code(&row.et, row.element).ok_or_else(|| {
                OnelineError::Network(format!(
                    "switch {} has unknown element type `{}`",
                    row.index, row.et
                ))
            })?;
            let mut spec =
                SwitchSpec::new(BusId::new(row.bus), element).with_text(row.name.as_str());
            if !row.closed {
                spec = spec.open();
            }
            diagram.add_switch(SwitchId::new(row.index), spec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    fn parse(source: &str) -> Network {
        toml::from_str(source).unwrap()
    }

    const FEEDER: &str = r#"
        [[bus]]
        index = 0
        name = "Source"
        geo = { x = 0.0, y = 0.0 }
        ikss_ka = 12.346

        [[bus]]
        index = 1
        name = "Load"
        geo = { x = 4.0, y = 0.0 }

        [[line]]
        index = 0
        from_bus = 0
        to_bus = 1
        std_type = "AC-70"
        length_km = 2.5

        [[switch]]
        index = 0
        bus = 0
        element = 0
        et = "l"
        closed = false
    "#;

    #[test]
    fn test_build_simple_feeder() {
        let network = parse(FEEDER);
        let diagram = network.build_diagram(&AppConfig::default()).unwrap();

        assert_eq!(diagram.len(), 4);
        let line = diagram.get_line(LineId::new(0)).unwrap();
        assert_eq!(line.label().rows(), ["AC-70 2.5 km"]);
        let bus = diagram.get_bus(BusId::new(0)).unwrap();
        assert_eq!(bus.label().rows(), ["Source", "Ik=12.35 kA"]);
        let switch = diagram.get_switch(SwitchId::new(0)).unwrap();
        assert!(!switch.is_closed());
    }

    #[test]
    fn test_impedance_mode_label() {
        let mut network = parse(FEEDER);
        network.line[0].r_ohm_per_km = 0.4;
        network.line[0].x_ohm_per_km = 0.2;
        let mut config = AppConfig::default();
        config.labels.line_impedance = true;

        let diagram = network.build_diagram(&config).unwrap();
        let line = diagram.get_line(LineId::new(0)).unwrap();
        assert_eq!(line.label().rows(), ["1.000+j0.500 Ohm"]);
    }

    #[test]
    fn test_impedance_mode_trafo_label() {
        let mut source = FEEDER.to_string();
        source.push_str(
            r#"
            [[bus]]
            index = 2
            name = "LV"
            geo = { x = 4.0, y = -4.0 }

            [[trafo]]
            index = 0
            name = "T1"
            hv_bus = 1
            lv_bus = 2
            std_type = "25 MVA 110/20 kV"
            r_ohm = 0.5
            x_ohm = 4.0
            "#,
        );
        let network = parse(&source);
        let mut config = AppConfig::default();

        let diagram = network.build_diagram(&config).unwrap();
        let trafo = diagram.get_trafo(TrafoId::new(0)).unwrap();
        assert_eq!(trafo.style(), TransformerStyle::Windings);
        assert_eq!(trafo.label().rows(), ["T1", "25 MVA 110/20 kV"]);

        config.labels.line_impedance = true;
        let diagram = network.build_diagram(&config).unwrap();
        let trafo = diagram.get_trafo(TrafoId::new(0)).unwrap();
        assert_eq!(trafo.style(), TransformerStyle::Impedance);
        assert_eq!(trafo.label().rows(), ["T1", "0.500+j4.000 Ohm"]);
    }

    #[test]
    fn test_impedance_mode_ext_grid_label() {
        let mut source = FEEDER.to_string();
        source.push_str(
            r#"
            [[ext_grid]]
            index = 0
            name = "Grid"
            bus = 0
            r_max_ohm = 0.1
            x_max_ohm = 1.0
            r_min_ohm = 0.2
            x_min_ohm = 2.0
            "#,
        );
        let network = parse(&source);
        let mut config = AppConfig::default();

        let diagram = network.build_diagram(&config).unwrap();
        let grid = diagram.get_ext_grid(ExtGridId::new(0)).unwrap();
        assert!(!grid.has_series_impedance());
        assert_eq!(grid.label().rows(), ["Grid"]);

        config.labels.line_impedance = true;
        let diagram = network.build_diagram(&config).unwrap();
        let grid = diagram.get_ext_grid(ExtGridId::new(0)).unwrap();
        assert!(grid.has_series_impedance());
        assert_eq!(
            grid.label().rows(),
            [
                "Grid",
                "Zmax=0.100+j1.000 = 1.005 Ohm",
                "Zmin=0.200+j2.000 = 2.010 Ohm"
            ]
        );
    }

    #[test]
    fn test_shunt_label_uses_bus_voltage() {
        let mut source = FEEDER.replace(
            "name = \"Load\"\n",
            "name = \"Load\"\n        vn_kv = 20.0\n",
        );
        source.push_str("[[shunt]]\nindex = 0\nbus = 1\np_mw = 0.5\nq_mvar = -4.0\n");
        let diagram = parse(&source).build_diagram(&AppConfig::default()).unwrap();
        let shunt = diagram.get_shunt(ShuntId::new(0)).unwrap();
        assert_eq!(shunt.label().rows(), ["r=800.0000", "x=-100.0000"]);
    }

    #[test]
    fn test_missing_coordinate() {
        let network = parse(
            r#"
            [[bus]]
            index = 7
            name = "Floating"
            "#,
        );
        let err = network.build_diagram(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, OnelineError::MissingCoordinate { bus } if bus == BusId::new(7)));
    }

    #[test]
    fn test_unknown_switch_element_type() {
        let mut network = parse(FEEDER);
        network.switch[0].et = "x".to_string();
        let err = network.build_diagram(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, OnelineError::Network(_)));
    }

    #[test]
    fn test_busy_bus_becomes_busbar() {
        let mut source = String::from("[[bus]]\nindex = 0\ngeo = { x = 0.0, y = 0.0 }\n");
        for i in 1..=4 {
            source.push_str(&format!(
                "[[bus]]\nindex = {i}\ngeo = {{ x = {x}.0, y = -4.0 }}\n",
                x = i * 2
            ));
            source.push_str(&format!("[[line]]\nindex = {i}\nfrom_bus = 0\nto_bus = {i}\n"));
        }
        let network = parse(&source);
        assert_eq!(network.incident_counts()[&0], 4);

        let diagram = network.build_diagram(&AppConfig::default()).unwrap();
        assert!(matches!(diagram.get_bus(BusId::new(0)), Some(BusSymbol::Busbar(_))));
        assert!(matches!(diagram.get_bus(BusId::new(1)), Some(BusSymbol::Node(_))));
        // the computed busbar has one port per line
        let starts: Vec<_> = (1..=4)
            .map(|i| diagram.get_line(LineId::new(i)).unwrap().route().start())
            .collect();
        assert_eq!(
            starts,
            [
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(6.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_out_of_service_generator_is_skipped() {
        let mut source = FEEDER.to_string();
        source.push_str("[[gen]]\nindex = 0\nbus = 1\np_mw = 5.0\nin_service = false\n");
        let diagram = parse(&source).build_diagram(&AppConfig::default()).unwrap();
        assert_eq!(diagram.len(), 4);
    }
}
