use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::{
        Stubs,
        switch::{draw_switch, switch_stubs},
    },
    geometry::{Point, direction_angle},
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ElementKey, SwitchId},
    symbol::{Seat, Symbol},
};

/// Parameters of a switch between a bus and an element.
#[derive(Debug, Clone)]
pub struct SwitchSpec {
    pub bus: BusId,
    pub element: ElementKey,
    pub closed: bool,
    pub text: String,
}

impl SwitchSpec {
    /// A closed, unlabelled switch
    pub fn new(bus: BusId, element: ElementKey) -> Self {
        Self {
            bus,
            element,
            closed: true,
            text: String::new(),
        }
    }

    pub fn open(mut self) -> Self {
        self.closed = false;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Where a switch is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwitchPlacement {
    /// On a line or transformer lead; the owner of the connection draws the
    /// conductor pieces on both sides.
    Seated(Seat),
    /// Between two buses; the switch draws both of its conductor pieces.
    Coupler { from: Point, to: Point },
}

impl SwitchPlacement {
    pub fn center(&self) -> Point {
        match self {
            Self::Seated(seat) => seat.center,
            Self::Coupler { from, to } => from.midpoint(*to),
        }
    }

    /// Axis rotation in radians
    pub fn angle(&self) -> f32 {
        match self {
            Self::Seated(seat) => seat.angle,
            Self::Coupler { from, to } => direction_angle(*from, *to),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Switch {
    id: SwitchId,
    bus: BusId,
    element: ElementKey,
    closed: bool,
    placement: SwitchPlacement,
    label: TextBlock,
}

impl Switch {
    pub fn new(
        id: SwitchId,
        spec: SwitchSpec,
        placement: SwitchPlacement,
        layout: &LayoutConfig,
    ) -> Self {
        let anchor = placement.center().add_point(Point::new(0.3, 0.2));
        let label = TextBlock::new(vec![spec.text], anchor)
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);
        Self {
            id,
            bus: spec.bus,
            element: spec.element,
            closed: spec.closed,
            placement,
            label,
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    pub fn element(&self) -> ElementKey {
        self.element
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn placement(&self) -> &SwitchPlacement {
        &self.placement
    }

    /// The two points where conductors meet the switch
    pub fn stubs(&self) -> Stubs {
        switch_stubs(self.placement.center(), self.placement.angle())
    }
}

impl Symbol for Switch {
    fn category(&self) -> Category {
        Category::Switch
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(switch = self.id.index(), closed = self.closed; "Drawing switch");
        let stubs = draw_switch(
            backend,
            self.placement.center(),
            self.placement.angle(),
            self.closed,
        );
        if let SwitchPlacement::Coupler { from, to } = self.placement {
            backend.lines(&[from, stubs.start], false);
            backend.lines(&[stubs.end, to], false);
        }
        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        let stubs = self.stubs();
        vec![stubs.start, stubs.end]
    }
}
