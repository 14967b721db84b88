//! Sources feeding a bus: generators and external grids.

use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::{
        ext_grid::{self, draw_ext_grid},
        generator::{self, draw_generator},
    },
    geometry::Point,
    text::{Growth, TextBlock},
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ExtGridId, GenId},
    symbol::{Port, Symbol, impedance::SeriesReactor},
};

/// A generator hanging below its bus.
#[derive(Debug, Clone)]
pub struct Generator {
    id: GenId,
    bus: BusId,
    attach: Point,
    label: TextBlock,
}

impl Generator {
    pub fn new(id: GenId, port: Port, text: Vec<String>, layout: &LayoutConfig) -> Self {
        let attach = port.point;
        let anchor = generator::label_anchor(generator::machine_center(attach));
        let label = TextBlock::new(text, anchor)
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E)
            .with_growth(Growth::Down);
        Self {
            id,
            bus: port.bus,
            attach,
            label,
        }
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }
}

impl Symbol for Generator {
    fn category(&self) -> Category {
        Category::Gen
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(generator = self.id.index(), bus = self.bus.index(); "Drawing generator");
        draw_generator(backend, self.attach);
        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.attach]
    }
}

/// Height of the series reactor between a bus and an external grid drawn
/// behind its short-circuit impedance.
const SERIES_LENGTH: f32 = 2.0;

/// An external grid standing above its bus, optionally behind a series
/// reactor standing for its short-circuit impedance.
#[derive(Debug, Clone)]
pub struct ExtGrid {
    id: ExtGridId,
    bus: BusId,
    attach: Point,
    series: Option<SeriesReactor>,
    label: TextBlock,
}

impl ExtGrid {
    pub fn new(id: ExtGridId, port: Port, text: Vec<String>, layout: &LayoutConfig) -> Self {
        Self::build(id, port, None, text, layout)
    }

    pub fn behind_impedance(
        id: ExtGridId,
        port: Port,
        text: Vec<String>,
        layout: &LayoutConfig,
    ) -> Self {
        let top = port.point.add_point(Point::new(0.0, SERIES_LENGTH));
        let series = SeriesReactor::between(port.point, top);
        Self::build(id, port, Some(series), text, layout)
    }

    fn build(
        id: ExtGridId,
        port: Port,
        series: Option<SeriesReactor>,
        text: Vec<String>,
        layout: &LayoutConfig,
    ) -> Self {
        let grid_base = series
            .as_ref()
            .map_or(port.point, |series| series.to_lead.start());
        let label = TextBlock::new(text, ext_grid::label_anchor(grid_base))
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);
        Self {
            id,
            bus: port.bus,
            attach: port.point,
            series,
            label,
        }
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    pub fn has_series_impedance(&self) -> bool {
        self.series.is_some()
    }

    /// Point the hatched square's lead starts from.
    fn grid_base(&self) -> Point {
        self.series
            .as_ref()
            .map_or(self.attach, |series| series.to_lead.start())
    }
}

impl Symbol for ExtGrid {
    fn category(&self) -> Category {
        Category::ExtGrid
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(
            ext_grid = self.id.index(),
            bus = self.bus.index(),
            series = self.series.is_some();
            "Drawing external grid"
        );
        if let Some(series) = &self.series {
            series.draw(backend);
        }
        draw_ext_grid(backend, self.grid_base());
        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.attach]
    }
}

#[cfg(test)]
mod tests {
    use oneline_core::backend::RecordingBackend;

    use super::*;

    #[test]
    fn test_generator_hangs_from_bus() {
        let port = Port::new(BusId::new(0), Point::new(1.0, 1.0));
        let layout = LayoutConfig::default();
        let generator = Generator::new(GenId::new(0), port, vec!["G1".into()], &layout);
        let mut backend = RecordingBackend::new();
        generator.draw(&Diagram::default(), &mut backend).unwrap();

        assert_eq!(generator.connection_points(), [Point::new(1.0, 1.0)]);
        let center = backend.circles().next().unwrap().center;
        assert!(center.y() < 1.0);
        assert!(backend.labels().any(|label| label.text == "G1"));
    }

    #[test]
    fn test_ext_grid_stands_above_bus() {
        let port = Port::new(BusId::new(4), Point::new(0.0, 0.0));
        let layout = LayoutConfig::default();
        let grid = ExtGrid::new(ExtGridId::new(0), port, vec!["Grid".into()], &layout);
        let mut backend = RecordingBackend::new();
        grid.draw(&Diagram::default(), &mut backend).unwrap();

        assert_eq!(grid.bus(), BusId::new(4));
        assert!(!grid.has_series_impedance());
        let highest = backend
            .polylines()
            .flat_map(|(points, _)| points.iter().map(|p| p.y()))
            .fold(f32::MIN, f32::max);
        assert!(highest > 2.0);
    }

    #[test]
    fn test_ext_grid_behind_impedance_lifts_square() {
        let port = Port::new(BusId::new(0), Point::new(0.0, 0.0));
        let layout = LayoutConfig::default();
        let plain = ExtGrid::new(ExtGridId::new(0), port, Vec::new(), &layout);
        let series = ExtGrid::behind_impedance(ExtGridId::new(1), port, Vec::new(), &layout);

        let highest = |grid: &ExtGrid| {
            let mut backend = RecordingBackend::new();
            grid.draw(&Diagram::default(), &mut backend).unwrap();
            let arcs = backend.circles().filter(|circle| circle.arc.is_some()).count();
            let top = backend
                .polylines()
                .flat_map(|(points, _)| points.iter().map(|p| p.y()))
                .fold(f32::MIN, f32::max);
            (arcs, top)
        };

        let (plain_arcs, plain_top) = highest(&plain);
        let (series_arcs, series_top) = highest(&series);
        assert!(series.has_series_impedance());
        assert_eq!(plain_arcs, 0);
        assert_eq!(series_arcs, 1);
        assert!((series_top - plain_top - SERIES_LENGTH).abs() < 1e-4);
        assert_eq!(series.connection_points(), [Point::new(0.0, 0.0)]);
    }
}
