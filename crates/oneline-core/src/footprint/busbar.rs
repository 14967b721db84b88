//! Busbar footprint: a thick bar between two points.

use crate::{
    backend::Backend,
    footprint::{Frame, NODE_RADIUS},
    geometry::{Point, direction_angle},
};

/// Half thickness of the bar.
pub const HALF_THICKNESS: f32 = NODE_RADIUS;

/// Draws a busbar from `start` to `end` as a closed outline.
pub fn draw_busbar(backend: &mut dyn Backend, start: Point, end: Point) {
    let frame = Frame::new(start, direction_angle(start, end));
    let length = start.distance(end);

    backend.lines(
        &[
            frame.point(0.0, HALF_THICKNESS),
            frame.point(length, HALF_THICKNESS),
            frame.point(length, -HALF_THICKNESS),
            frame.point(0.0, -HALF_THICKNESS),
        ],
        true,
    );
}
