//! The diagram aggregate.
//!
//! A [`Diagram`] is a registry of placed symbols, one map per category keyed
//! by the element's typed index. Symbols resolve the elements they reference
//! when they are added, so every reference must already be registered:
//! buses first, then the elements connecting them, switches last.
//!
//! Every element attached to a bus claims the bus's next free port when it
//! is added. A node has a single port at its centre; a busbar has one port
//! every `busbar_pitch` units from its start, reused round-robin once they
//! are all taken.
//!
//! Drawing visits the categories in a fixed order (buses, switches, lines,
//! transformers, impedances, sources, shunts) and then asks the backend to
//! persist the drawing.

use indexmap::IndexMap;
use log::{debug, info};

use oneline_core::{
    backend::Backend,
    geometry::{Point, nearest_pair},
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    identifier::{
        BusId, Category, ElementKey, ExtGridId, GenId, ImpedanceId, LineId, ShuntId, SwitchId,
        Trafo3wId, TrafoId,
    },
    symbol::{
        BusSymbol, Busbar, Connection, ExtGrid, Generator, Impedance, Line, LineSpec, Node, Port,
        Shunt, Switch, SwitchPlacement, SwitchSpec, Symbol, Transformer, Transformer3w,
        Transformer3wSpec, TransformerSpec,
    },
};

/// Rejects an index already present in `map`.
fn ensure_vacant<K, V>(
    map: &IndexMap<K, V>,
    key: &K,
    category: Category,
    index: usize,
) -> Result<(), OnelineError>
where
    K: std::hash::Hash + Eq,
{
    if map.contains_key(key) {
        return Err(OnelineError::DuplicateIndex { category, index });
    }
    Ok(())
}

/// Registry of placed symbols.
///
/// # Examples
///
/// ```
/// # use oneline::{diagram::Diagram, identifier::{BusId, LineId}, symbol::LineSpec};
/// # use oneline_core::{backend::RecordingBackend, geometry::Point};
/// let mut diagram = Diagram::default();
/// diagram.add_node(BusId::new(0), Point::new(0.0, 0.0), vec!["Bus 0".into()])?;
/// diagram.add_node(BusId::new(1), Point::new(4.0, 0.0), vec!["Bus 1".into()])?;
/// diagram.add_line(LineId::new(0), LineSpec::new(BusId::new(0), BusId::new(1)))?;
///
/// let mut backend = RecordingBackend::new();
/// diagram.draw(&mut backend)?;
/// assert_eq!(backend.polylines().count(), 1);
/// assert!(backend.is_saved());
/// # Ok::<(), oneline::OnelineError>(())
/// ```
#[derive(Debug, Default)]
pub struct Diagram {
    layout: LayoutConfig,
    buses: IndexMap<BusId, BusSymbol>,
    /// Next free port per bus
    ports: IndexMap<BusId, usize>,
    lines: IndexMap<LineId, Line>,
    switches: IndexMap<SwitchId, Switch>,
    switch_seats: IndexMap<(ElementKey, BusId), SwitchId>,
    trafos: IndexMap<TrafoId, Transformer>,
    trafos3w: IndexMap<Trafo3wId, Transformer3w>,
    impedances: IndexMap<ImpedanceId, Impedance>,
    gens: IndexMap<GenId, Generator>,
    ext_grids: IndexMap<ExtGridId, ExtGrid>,
    shunts: IndexMap<ShuntId, Shunt>,
}

impl Diagram {
    /// Creates an empty diagram laid out with `layout`.
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Registers a bus drawn as a node at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::DuplicateIndex`] if the bus is already registered.
    pub fn add_node(
        &mut self,
        id: BusId,
        position: Point,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        let node = Node::new(id, position, text, &self.layout);
        self.insert_bus(BusSymbol::Node(node))
    }

    /// Registers a bus drawn as a busbar from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::DuplicateIndex`] if the bus is already registered.
    pub fn add_bus(
        &mut self,
        id: BusId,
        start: Point,
        end: Point,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        let busbar = Busbar::new(id, start, end, text, &self.layout);
        self.insert_bus(BusSymbol::Busbar(busbar))
    }

    /// Registers a prepared bus symbol.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::DuplicateIndex`] if the bus is already registered.
    pub fn insert_bus(&mut self, bus: BusSymbol) -> Result<(), OnelineError> {
        let id = bus.id();
        ensure_vacant(&self.buses, &id, Category::Bus, id.index())?;
        debug!(bus = id.index(); "Registered bus");
        self.buses.insert(id, bus);
        Ok(())
    }

    /// Registers a line between two registered buses.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if either bus is
    /// missing, or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_line(&mut self, id: LineId, spec: LineSpec) -> Result<(), OnelineError> {
        ensure_vacant(&self.lines, &id, Category::Line, id.index())?;
        self.bus(spec.from_bus)?;
        self.bus(spec.to_bus)?;
        let from = self.claim_port(spec.from_bus)?;
        let to = self.claim_port(spec.to_bus)?;
        let line = Line::new(id, spec, from, to, &self.layout);
        debug!(line = id.index(), length = line.route().length(); "Registered line");
        self.lines.insert(id, line);
        Ok(())
    }

    /// Registers a switch between a bus and an element.
    ///
    /// A switch on a line or transformer lead is seated `switch_offset`
    /// units from the bus along the connection. A switch whose element is
    /// another bus becomes a coupler between the nearest anchor points of
    /// the two buses.
    ///
    /// # Errors
    ///
    /// - [`OnelineError::UnresolvedReference`] if the bus or element is missing
    /// - [`OnelineError::InvalidSwitchGeometry`] if the bus is not an end of
    ///   the element, or a coupler joins a bus to itself
    /// - [`OnelineError::DuplicateSwitch`] if the element end already has a switch
    /// - [`OnelineError::DuplicateIndex`] for a reused index
    pub fn add_switch(&mut self, id: SwitchId, spec: SwitchSpec) -> Result<(), OnelineError> {
        ensure_vacant(&self.switches, &id, Category::Switch, id.index())?;
        let bus = self.bus(spec.bus)?;
        let seat_key = (spec.element, spec.bus);
        if self.switch_seats.contains_key(&seat_key) {
            return Err(OnelineError::DuplicateSwitch {
                element: spec.element,
                bus: spec.bus,
            });
        }

        let offset = self.layout.switch_offset;
        let placement = match spec.element {
            ElementKey::Bus(other) => {
                if other == spec.bus {
                    return Err(OnelineError::InvalidSwitchGeometry {
                        element: spec.element,
                        bus: spec.bus,
                    });
                }
                let other = self.bus(other)?;
                let (from, to) = nearest_pair(&bus.anchor_points(), &other.anchor_points())
                    .ok_or_else(|| OnelineError::unresolved(Category::Bus, spec.bus.index()))?;
                SwitchPlacement::Coupler { from, to }
            }
            key => {
                let seat = self.connection(key)?.get_coords_switch(spec.bus, offset)?;
                SwitchPlacement::Seated(seat)
            }
        };

        debug!(
            switch = id.index(),
            element:% = spec.element,
            bus = spec.bus.index();
            "Registered switch"
        );
        let switch = Switch::new(id, spec, placement, &self.layout);
        self.switch_seats.insert(seat_key, id);
        self.switches.insert(id, switch);
        Ok(())
    }

    /// Registers a two-winding transformer.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if either bus is
    /// missing, or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_trafo(&mut self, id: TrafoId, spec: TransformerSpec) -> Result<(), OnelineError> {
        ensure_vacant(&self.trafos, &id, Category::Trafo, id.index())?;
        self.bus(spec.hv_bus)?;
        self.bus(spec.lv_bus)?;
        let hv = self.claim_port(spec.hv_bus)?;
        let lv = self.claim_port(spec.lv_bus)?;
        let trafo = Transformer::new(id, spec, hv, lv, &self.layout);
        debug!(trafo = id.index(); "Registered transformer");
        self.trafos.insert(id, trafo);
        Ok(())
    }

    /// Registers a three-winding transformer.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if any bus is missing,
    /// or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_trafo3w(
        &mut self,
        id: Trafo3wId,
        spec: Transformer3wSpec,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.trafos3w, &id, Category::Trafo3w, id.index())?;
        for bus in [spec.hv_bus, spec.mv_bus, spec.lv_bus] {
            self.bus(bus)?;
        }
        let hv = self.claim_port(spec.hv_bus)?;
        let mv = self.claim_port(spec.mv_bus)?;
        let lv = self.claim_port(spec.lv_bus)?;
        let trafo = Transformer3w::new(id, spec, hv, mv, lv, &self.layout);
        debug!(trafo3w = id.index(); "Registered three-winding transformer");
        self.trafos3w.insert(id, trafo);
        Ok(())
    }

    /// Registers a series impedance between two buses.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if either bus is
    /// missing, or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_impedance(
        &mut self,
        id: ImpedanceId,
        from_bus: BusId,
        to_bus: BusId,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.impedances, &id, Category::Impedance, id.index())?;
        self.bus(from_bus)?;
        self.bus(to_bus)?;
        let from = self.claim_port(from_bus)?;
        let to = self.claim_port(to_bus)?;
        let impedance = Impedance::new(id, from, to, text, &self.layout);
        debug!(impedance = id.index(); "Registered impedance");
        self.impedances.insert(id, impedance);
        Ok(())
    }

    /// Registers a generator below its bus.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if the bus is missing,
    /// or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_gen(
        &mut self,
        id: GenId,
        bus: BusId,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.gens, &id, Category::Gen, id.index())?;
        let port = self.claim_port(bus)?;
        let generator = Generator::new(id, port, text, &self.layout);
        debug!(generator = id.index(), bus = bus.index(); "Registered generator");
        self.gens.insert(id, generator);
        Ok(())
    }

    /// Registers an external grid above its bus.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if the bus is missing,
    /// or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_ext_grid(
        &mut self,
        id: ExtGridId,
        bus: BusId,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.ext_grids, &id, Category::ExtGrid, id.index())?;
        let port = self.claim_port(bus)?;
        self.insert_ext_grid(ExtGrid::new(id, port, text, &self.layout));
        Ok(())
    }

    /// Registers an external grid drawn behind a series reactor standing
    /// for its short-circuit impedance.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if the bus is missing,
    /// or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_ext_grid_behind_impedance(
        &mut self,
        id: ExtGridId,
        bus: BusId,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.ext_grids, &id, Category::ExtGrid, id.index())?;
        let port = self.claim_port(bus)?;
        self.insert_ext_grid(ExtGrid::behind_impedance(id, port, text, &self.layout));
        Ok(())
    }

    fn insert_ext_grid(&mut self, grid: ExtGrid) {
        debug!(
            ext_grid = grid.index(),
            bus = grid.bus().index(),
            series = grid.has_series_impedance();
            "Registered external grid"
        );
        self.ext_grids.insert(ExtGridId::new(grid.index()), grid);
    }

    /// Registers a shunt below its bus; the sign of `q_mvar` selects the
    /// capacitive or inductive symbol.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::UnresolvedReference`] if the bus is missing,
    /// or [`OnelineError::DuplicateIndex`] for a reused index.
    pub fn add_shunt(
        &mut self,
        id: ShuntId,
        bus: BusId,
        q_mvar: f64,
        text: Vec<String>,
    ) -> Result<(), OnelineError> {
        ensure_vacant(&self.shunts, &id, Category::Shunt, id.index())?;
        let port = self.claim_port(bus)?;
        let shunt = Shunt::new(id, port, q_mvar, text, &self.layout);
        debug!(shunt = id.index(), bus = bus.index(); "Registered shunt");
        self.shunts.insert(id, shunt);
        Ok(())
    }

    pub fn get_bus(&self, id: BusId) -> Option<&BusSymbol> {
        self.buses.get(&id)
    }

    pub fn get_line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn get_switch(&self, id: SwitchId) -> Option<&Switch> {
        self.switches.get(&id)
    }

    pub fn get_trafo(&self, id: TrafoId) -> Option<&Transformer> {
        self.trafos.get(&id)
    }

    pub fn get_trafo3w(&self, id: Trafo3wId) -> Option<&Transformer3w> {
        self.trafos3w.get(&id)
    }

    pub fn get_impedance(&self, id: ImpedanceId) -> Option<&Impedance> {
        self.impedances.get(&id)
    }

    pub fn get_gen(&self, id: GenId) -> Option<&Generator> {
        self.gens.get(&id)
    }

    pub fn get_ext_grid(&self, id: ExtGridId) -> Option<&ExtGrid> {
        self.ext_grids.get(&id)
    }

    pub fn get_shunt(&self, id: ShuntId) -> Option<&Shunt> {
        self.shunts.get(&id)
    }

    /// Looks up any element a switch can reference.
    pub fn get_element(&self, key: ElementKey) -> Option<&dyn Symbol> {
        match key {
            ElementKey::Bus(id) => self.buses.get(&id).map(|s| s as &dyn Symbol),
            ElementKey::Line(id) => self.lines.get(&id).map(|s| s as &dyn Symbol),
            ElementKey::Trafo(id) => self.trafos.get(&id).map(|s| s as &dyn Symbol),
            ElementKey::Trafo3w(id) => self.trafos3w.get(&id).map(|s| s as &dyn Symbol),
        }
    }

    /// The switch sitting between `bus` and `element`, if any.
    pub fn switch_at(&self, element: ElementKey, bus: BusId) -> Option<&Switch> {
        self.switch_seats
            .get(&(element, bus))
            .and_then(|id| self.switches.get(id))
    }

    /// Number of registered symbols across all categories
    pub fn len(&self) -> usize {
        self.symbols().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All symbols in draw order.
    pub fn symbols(&self) -> impl Iterator<Item = &dyn Symbol> {
        fn erase<'a, S: Symbol + 'a>(symbol: &'a S) -> &'a dyn Symbol {
            symbol
        }

        self.buses
            .values()
            .map(erase)
            .chain(self.switches.values().map(erase))
            .chain(self.lines.values().map(erase))
            .chain(self.trafos.values().map(erase))
            .chain(self.trafos3w.values().map(erase))
            .chain(self.impedances.values().map(erase))
            .chain(self.gens.values().map(erase))
            .chain(self.ext_grids.values().map(erase))
            .chain(self.shunts.values().map(erase))
    }

    /// Draws every symbol and persists the drawing.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError`] if a symbol fails to draw or the backend
    /// fails to save. Nothing is saved after a failure.
    pub fn draw(&self, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        info!(
            buses = self.buses.len(),
            lines = self.lines.len(),
            switches = self.switches.len(),
            trafos = self.trafos.len() + self.trafos3w.len();
            "Drawing diagram"
        );

        let mut count = 0usize;
        for symbol in self.symbols() {
            symbol.draw(self, backend)?;
            count += 1;
        }
        debug!(symbols = count; "Symbols drawn");

        backend.save()?;
        Ok(())
    }

    fn bus(&self, id: BusId) -> Result<&BusSymbol, OnelineError> {
        self.buses
            .get(&id)
            .ok_or_else(|| OnelineError::unresolved(Category::Bus, id.index()))
    }

    /// Hands out the next port of bus `id`.
    fn claim_port(&mut self, id: BusId) -> Result<Port, OnelineError> {
        let bus = self
            .buses
            .get(&id)
            .ok_or_else(|| OnelineError::unresolved(Category::Bus, id.index()))?;
        let slot = self.ports.entry(id).or_default();
        let port = bus.port(*slot);
        *slot += 1;
        Ok(port)
    }

    fn connection(&self, key: ElementKey) -> Result<&dyn Connection, OnelineError> {
        let connection = match key {
            ElementKey::Line(id) => self.lines.get(&id).map(|c| c as &dyn Connection),
            ElementKey::Trafo(id) => self.trafos.get(&id).map(|c| c as &dyn Connection),
            ElementKey::Trafo3w(id) => self.trafos3w.get(&id).map(|c| c as &dyn Connection),
            ElementKey::Bus(_) => None,
        };
        connection.ok_or_else(|| OnelineError::unresolved(key.category(), key.index()))
    }
}
