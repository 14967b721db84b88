//! Switch footprint: a square with a blade.

use crate::{
    backend::Backend,
    footprint::{Frame, NODE_RADIUS, Stubs},
    geometry::Point,
};

/// Half the side length of the switch square.
pub const SWITCH_SIZE: f32 = NODE_RADIUS * 2.0;

/// Draws a switch centred on `center`, its axis turned by `angle`.
///
/// The outline is a square. A closed switch draws its blade along the axis
/// between the two connection midpoints, so the conductor visibly passes
/// through; an open switch draws the perpendicular blade instead, leaving a
/// gap on the axis.
///
/// Returns the midpoints of the two axis-facing sides: `start` faces the
/// direction the angle comes from, `end` the direction it points to.
pub fn draw_switch(backend: &mut dyn Backend, center: Point, angle: f32, closed: bool) -> Stubs {
    let frame = Frame::new(center, angle);
    let s = SWITCH_SIZE;

    let outline = [
        frame.point(-s, s),
        frame.point(s, s),
        frame.point(s, -s),
        frame.point(-s, -s),
    ];
    backend.lines(&outline, true);

    let stubs = switch_stubs(center, angle);

    if closed {
        backend.lines(&[stubs.start, stubs.end], false);
    } else {
        backend.lines(&[frame.point(0.0, s), frame.point(0.0, -s)], false);
    }

    stubs
}

/// Connection stubs of a switch, without drawing it.
pub fn switch_stubs(center: Point, angle: f32) -> Stubs {
    let frame = Frame::new(center, angle);
    Stubs {
        start: frame.point(-SWITCH_SIZE, 0.0),
        end: frame.point(SWITCH_SIZE, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn test_closed_switch_blade_joins_stubs() {
        let mut backend = RecordingBackend::new();
        let stubs = draw_switch(&mut backend, Point::new(1.0, 0.0), 0.0, true);

        assert!(stubs.start.approx_eq(Point::new(0.8, 0.0), 1e-6));
        assert!(stubs.end.approx_eq(Point::new(1.2, 0.0), 1e-6));

        let lines: Vec<_> = backend.polylines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1, "outline is closed");
        assert_eq!(lines[0].0.len(), 4);
        assert_eq!(lines[1].0, &[stubs.start, stubs.end]);
    }

    #[test]
    fn test_open_switch_blade_is_perpendicular() {
        let mut backend = RecordingBackend::new();
        let stubs = draw_switch(&mut backend, Point::default(), 0.0, false);

        let blade = backend.polylines().nth(1).unwrap().0;
        assert!(blade[0].approx_eq(Point::new(0.0, SWITCH_SIZE), 1e-6));
        assert!(blade[1].approx_eq(Point::new(0.0, -SWITCH_SIZE), 1e-6));
        assert!(!blade.contains(&stubs.start));
    }

    #[test]
    fn test_switch_follows_angle() {
        let mut backend = RecordingBackend::new();
        let stubs = draw_switch(&mut backend, Point::default(), FRAC_PI_2, true);

        assert!(stubs.start.approx_eq(Point::new(0.0, -SWITCH_SIZE), 1e-6));
        assert!(stubs.end.approx_eq(Point::new(0.0, SWITCH_SIZE), 1e-6));
    }
}
