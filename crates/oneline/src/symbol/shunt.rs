use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::shunt::{self, ShuntKind, draw_shunt},
    geometry::Point,
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ShuntId},
    symbol::{Port, Symbol},
};

/// A shunt compensator between its bus and ground.
///
/// Negative reactive power is capacitive; anything else is drawn as a
/// reactor.
#[derive(Debug, Clone)]
pub struct Shunt {
    id: ShuntId,
    bus: BusId,
    attach: Point,
    kind: ShuntKind,
    label: TextBlock,
}

impl Shunt {
    pub fn new(
        id: ShuntId,
        port: Port,
        q_mvar: f64,
        text: Vec<String>,
        layout: &LayoutConfig,
    ) -> Self {
        let attach = port.point;
        let label = TextBlock::new(text, shunt::label_anchor(attach))
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);
        Self {
            id,
            bus: port.bus,
            attach,
            kind: ShuntKind::from_reactive_power(q_mvar),
            label,
        }
    }

    pub fn kind(&self) -> ShuntKind {
        self.kind
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }
}

impl Symbol for Shunt {
    fn category(&self) -> Category {
        Category::Shunt
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(shunt = self.id.index(), kind:? = self.kind; "Drawing shunt");
        draw_shunt(backend, self.attach, self.kind);
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
