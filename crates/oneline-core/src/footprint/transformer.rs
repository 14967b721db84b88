//! Two-winding transformer footprint.

use crate::{
    backend::{Backend, Circle},
    footprint::{
        Frame, NODE_RADIUS, Stubs,
        winding::{VectorGroup, draw_mark, plan_two_winding},
    },
    geometry::Point,
};

/// Radius of a winding ring.
pub const RING_RADIUS: f32 = NODE_RADIUS * 4.0;
/// Distance from the transformer centre to each ring centre.
pub const RING_OFFSET: f32 = RING_RADIUS - NODE_RADIUS;
/// Distance from the transformer centre to each connection stub, where the
/// ring meets the lead.
pub const STUB_OFFSET: f32 = RING_RADIUS * 2.0 - NODE_RADIUS;

/// Draws two overlapping rings stacked along the local Y axis, high voltage
/// on top.
///
/// `angle` turns local +Y onto the high-voltage direction; use
/// [`axis_angle`](crate::geometry::axis_angle)`(low, high)`. Winding glyphs
/// from `vector_group` are drawn on their rings.
///
/// Returns `start` on the high-voltage side and `end` on the low-voltage side.
pub fn draw_transformer(
    backend: &mut dyn Backend,
    center: Point,
    angle: f32,
    vector_group: Option<&VectorGroup>,
) -> Stubs {
    let frame = Frame::new(center, angle);

    backend.circle(Circle::new(frame.point(0.0, RING_OFFSET), RING_RADIUS));
    backend.circle(Circle::new(frame.point(0.0, -RING_OFFSET), RING_RADIUS));

    if let Some(group) = vector_group {
        for mark in plan_two_winding(group) {
            draw_mark(backend, &frame, mark);
        }
    }

    transformer_stubs(center, angle)
}

/// Connection stubs of a two-winding transformer, without drawing it.
pub fn transformer_stubs(center: Point, angle: f32) -> Stubs {
    let frame = Frame::new(center, angle);
    Stubs {
        start: frame.point(0.0, STUB_OFFSET),
        end: frame.point(0.0, -STUB_OFFSET),
    }
}

/// Anchor of the transformer label, beside the rings.
pub fn label_anchor(center: Point, angle: f32) -> Point {
    Frame::new(center, angle).point(RING_OFFSET, 0.0)
}
