use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::{
        busbar::{HALF_THICKNESS, draw_busbar},
        node::{self, draw_node},
    },
    geometry::Point,
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category},
    symbol::Symbol,
};

/// A bus with few connections, drawn as a dot.
#[derive(Debug, Clone)]
pub struct Node {
    id: BusId,
    center: Point,
    label: TextBlock,
}

impl Node {
    pub fn new(id: BusId, center: Point, text: Vec<String>, layout: &LayoutConfig) -> Self {
        let label = TextBlock::new(text, node::label_anchor(center))
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);
        Self { id, center, label }
    }

    /// Overrides the label anchor
    pub fn with_label_anchor(mut self, anchor: Point) -> Self {
        self.label = self.label.with_anchor(anchor);
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

/// A bus with many connections, drawn as a bar.
///
/// The bar offers a connection slot every `pitch` units from `start`. A bar
/// shorter than one pitch has a single slot at its midpoint.
#[derive(Debug, Clone)]
pub struct Busbar {
    id: BusId,
    start: Point,
    end: Point,
    pitch: f32,
    label: TextBlock,
}

impl Busbar {
    pub fn new(
        id: BusId,
        start: Point,
        end: Point,
        text: Vec<String>,
        layout: &LayoutConfig,
    ) -> Self {
        let left = if start.x() <= end.x() { start } else { end };
        let anchor = left.add_point(Point::new(0.0, HALF_THICKNESS * 2.0));
        let label = TextBlock::new(text, anchor)
            .with_max_len(layout.node_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);
        Self {
            id,
            start,
            end,
            pitch: layout.busbar_pitch,
            label,
        }
    }

    /// Overrides the label anchor
    pub fn with_label_anchor(mut self, anchor: Point) -> Self {
        self.label = self.label.with_anchor(anchor);
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Number of connection slots along the bar
    pub fn slot_count(&self) -> usize {
        let length = self.start.distance(self.end);
        if self.pitch <= 0.0 || length < self.pitch {
            return 1;
        }
        (length / self.pitch + SLOT_TOLERANCE).floor() as usize + 1
    }

    /// Position of connection slot `slot`; slots past the last one wrap
    /// around to the start.
    pub fn slot(&self, slot: usize) -> Point {
        let count = self.slot_count();
        if count == 1 {
            return self.start.midpoint(self.end);
        }
        let offset = (slot % count) as f32 * self.pitch;
        self.start.towards(self.end, offset)
    }
}

/// Absorbs rounding when the bar length is a whole number of pitches.
const SLOT_TOLERANCE: f32 = 1e-3;

/// A connection point claimed on a bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub bus: BusId,
    pub point: Point,
}

impl Port {
    pub fn new(bus: BusId, point: Point) -> Self {
        Self { bus, point }
    }
}

/// Either representation of a bus.
#[derive(Debug, Clone)]
pub enum BusSymbol {
    Node(Node),
    Busbar(Busbar),
}

impl BusSymbol {
    pub fn id(&self) -> BusId {
        match self {
            Self::Node(node) => node.id,
            Self::Busbar(busbar) => busbar.id,
        }
    }

    /// Overrides the label anchor
    pub fn with_label_anchor(self, anchor: Point) -> Self {
        match self {
            Self::Node(node) => Self::Node(node.with_label_anchor(anchor)),
            Self::Busbar(busbar) => Self::Busbar(busbar.with_label_anchor(anchor)),
        }
    }

    /// The port of connection slot `slot`.
    ///
    /// Every slot of a node is its centre.
    pub fn port(&self, slot: usize) -> Port {
        let point = match self {
            Self::Node(node) => node.center,
            Self::Busbar(busbar) => busbar.slot(slot),
        };
        Port::new(self.id(), point)
    }

    /// Candidate points for a bus coupler.
    pub fn anchor_points(&self) -> Vec<Point> {
        match self {
            Self::Node(node) => vec![node.center],
            Self::Busbar(busbar) => vec![busbar.start, busbar.end],
        }
    }
}

impl Symbol for BusSymbol {
    fn category(&self) -> Category {
        Category::Bus
    }

    fn index(&self) -> usize {
        self.id().index()
    }

    fn draw(&self, _diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        match self {
            Self::Node(node) => {
                trace!(bus = node.id.index(); "Drawing node");
                draw_node(backend, node.center);
            }
            Self::Busbar(busbar) => {
                trace!(bus = busbar.id.index(); "Drawing busbar");
                draw_busbar(backend, busbar.start, busbar.end);
            }
        }
        self.label().draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        match self {
            Self::Node(node) => &node.label,
            Self::Busbar(busbar) => &busbar.label,
        }
    }

    fn connection_points(&self) -> Vec<Point> {
        self.anchor_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busbar_slots_every_pitch() {
        let layout = LayoutConfig::default();
        let bus = BusSymbol::Busbar(Busbar::new(
            BusId::new(0),
            Point::new(-2.0, 0.0),
            Point::new(2.0, 0.0),
            vec!["MV".to_string()],
            &layout,
        ));

        assert_eq!(bus.port(0), Port::new(BusId::new(0), Point::new(-2.0, 0.0)));
        assert!(bus.port(1).point.approx_eq(Point::new(0.0, 0.0), 1e-6));
        assert!(bus.port(2).point.approx_eq(Point::new(2.0, 0.0), 1e-6));
        // wraps past the last slot
        assert!(bus.port(3).point.approx_eq(Point::new(-2.0, 0.0), 1e-6));
        assert_eq!(bus.anchor_points().len(), 2);
    }

    #[test]
    fn test_short_busbar_has_one_slot() {
        let layout = LayoutConfig::default();
        let busbar = Busbar::new(
            BusId::new(1),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Vec::new(),
            &layout,
        );

        assert_eq!(busbar.slot_count(), 1);
        assert_eq!(busbar.slot(0), Point::new(0.5, 0.0));
        assert_eq!(busbar.slot(4), Point::new(0.5, 0.0));
    }

    #[test]
    fn test_node_ports_share_centre() {
        let layout = LayoutConfig::default();
        let node = Node::new(BusId::new(2), Point::new(1.0, 1.0), Vec::new(), &layout);
        let node = BusSymbol::Node(node);
        assert_eq!(node.port(0), node.port(5));
    }

    #[test]
    fn test_node_label_anchor() {
        let layout = LayoutConfig::default();
        let node = Node::new(BusId::new(3), Point::new(1.0, 1.0), vec!["B3".to_string()], &layout);

        assert!(node.label.anchor().approx_eq(Point::new(1.2, 1.2), 1e-6));
        assert_eq!(node.label.max_len(), 10);

        let moved = node.with_label_anchor(Point::new(5.0, 5.0));
        assert_eq!(moved.label.anchor(), Point::new(5.0, 5.0));
        assert_eq!(moved.label.rows(), ["B3"]);
    }
}
