//! Reactor footprint: a three-quarter arc with a centre tap.

use crate::{
    backend::{ArcSpan, Backend, Circle},
    footprint::{Frame, NODE_RADIUS, Stubs},
    geometry::Point,
};

/// Radius of the reactor arc.
pub const REACTOR_RADIUS: f32 = NODE_RADIUS * 4.0;

/// Draws a reactor centred on `center`.
///
/// The arc opens towards the local upper right quadrant; the top of the arc
/// is the `start` stub and the centre tap is the `end` stub. `angle` turns
/// local +Y onto the direction of the start lead.
pub fn draw_reactor(backend: &mut dyn Backend, center: Point, angle: f32) -> Stubs {
    let frame = Frame::new(center, angle);

    backend.circle(
        Circle::new(center, REACTOR_RADIUS)
            .with_arc(ArcSpan::new(180.0, 90.0).rotated(angle.to_degrees())),
    );
    backend.lines(&[center, frame.point(-REACTOR_RADIUS, 0.0)], false);

    reactor_stubs(center, angle)
}

/// Connection stubs of a reactor, without drawing it.
pub fn reactor_stubs(center: Point, angle: f32) -> Stubs {
    Stubs {
        start: Frame::new(center, angle).point(0.0, REACTOR_RADIUS),
        end: center,
    }
}

/// Anchor of a reactor label, east of the arc.
pub fn label_anchor(center: Point) -> Point {
    center.add_point(Point::new(REACTOR_RADIUS - NODE_RADIUS, 0.0))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn test_upright_reactor() {
        let mut backend = RecordingBackend::new();
        let stubs = draw_reactor(&mut backend, Point::new(1.0, 1.0), 0.0);

        let arc = backend.circles().next().unwrap().arc.unwrap();
        assert_approx_eq!(f32, arc.start, 180.0);
        assert_approx_eq!(f32, arc.end, 90.0);
        assert!(stubs.start.approx_eq(Point::new(1.0, 1.4), 1e-6));
        assert_eq!(stubs.end, Point::new(1.0, 1.0));

        let (tap, _) = backend.polylines().next().unwrap();
        assert!(tap[1].approx_eq(Point::new(0.6, 1.0), 1e-6));
    }
}
