//! Node footprint: a solid dot.

use crate::{
    backend::{Backend, Circle},
    footprint::NODE_RADIUS,
    geometry::Point,
};

/// Draws a bus node at `center`.
pub fn draw_node(backend: &mut dyn Backend, center: Point) {
    backend.circle(Circle::new(center, NODE_RADIUS).filled());
}

/// Anchor of the node label, up and to the right of the dot.
pub fn label_anchor(center: Point) -> Point {
    center.add_point(Point::new(NODE_RADIUS * 2.0, NODE_RADIUS * 2.0))
}
