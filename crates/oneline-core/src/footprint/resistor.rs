//! Resistor / impedance footprint.

use crate::{
    backend::Backend,
    footprint::{Frame, NODE_RADIUS, Stubs},
    geometry::Point,
};

/// Half width of the resistor body.
pub const HALF_WIDTH: f32 = NODE_RADIUS * 1.5;
/// Half length of the resistor body, along its axis.
pub const HALF_LENGTH: f32 = NODE_RADIUS * 3.0;

/// Draws a rectangular impedance centred on `center`.
///
/// The body is authored along the local Y axis; pass
/// [`axis_angle`](crate::geometry::axis_angle)`(from, to)` to lay it on the
/// segment `from → to`. Returns the stubs at the two short ends.
pub fn draw_resistor(backend: &mut dyn Backend, center: Point, angle: f32) -> Stubs {
    let frame = Frame::new(center, angle);
    let (w, h) = (HALF_WIDTH, HALF_LENGTH);

    backend.lines(
        &[
            frame.point(-w, h),
            frame.point(w, h),
            frame.point(w, -h),
            frame.point(-w, -h),
        ],
        true,
    );

    Stubs {
        start: frame.point(0.0, -h),
        end: frame.point(0.0, h),
    }
}
