use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::reactor::{self, REACTOR_RADIUS, draw_reactor},
    geometry::{Point, axis_angle},
    route::Route,
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ImpedanceId},
    symbol::{Port, Symbol},
};

/// A reactor centred between two points, with a lead from each point to
/// its stub.
#[derive(Debug, Clone)]
pub(crate) struct SeriesReactor {
    pub center: Point,
    pub angle: f32,
    pub from_lead: Route,
    pub to_lead: Route,
}

impl SeriesReactor {
    /// The arc top faces `from`, the centre tap faces `to`.
    pub fn between(from: Point, to: Point) -> Self {
        let from_start = from.towards(to, REACTOR_RADIUS);
        let to_start = to.towards(from, REACTOR_RADIUS);
        let center = from_start.midpoint(to_start);
        let angle = axis_angle(to, from);

        let stubs = reactor::reactor_stubs(center, angle);
        Self {
            center,
            angle,
            from_lead: Route::straight(from, stubs.start),
            to_lead: Route::straight(to, stubs.end),
        }
    }

    pub fn label_anchor(&self) -> Point {
        reactor::label_anchor(self.center)
    }

    pub fn draw(&self, backend: &mut dyn Backend) {
        draw_reactor(backend, self.center, self.angle);
        backend.lines(self.from_lead.points(), false);
        backend.lines(self.to_lead.points(), false);
    }
}

/// A series reactor between two buses.
#[derive(Debug, Clone)]
pub struct Impedance {
    id: ImpedanceId,
    from_bus: BusId,
    to_bus: BusId,
    reactor: SeriesReactor,
    label: TextBlock,
}

impl Impedance {
    pub fn new(
        id: ImpedanceId,
        from: Port,
        to: Port,
        text: Vec<String>,
        layout: &LayoutConfig,
    ) -> Self {
        let reactor = SeriesReactor::between(from.point, to.point);
        let label = TextBlock::new(text, reactor.label_anchor())
            .with_max_len(layout.trafo_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);

        Self {
            id,
            from_bus: from.bus,
            to_bus: to.bus,
            reactor,
            label,
        }
    }

    pub fn center(&self) -> Point {
        self.reactor.center
    }
}

impl Symbol for Impedance {
    fn category(&self) -> Category {
        Category::Impedance
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(
            impedance = self.id.index(),
            from = self.from_bus.index(),
            to = self.to_bus.index();
            "Drawing impedance"
        );
        self.reactor.draw(backend);
        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.reactor.from_lead.start(), self.reactor.to_lead.start()]
    }
}
