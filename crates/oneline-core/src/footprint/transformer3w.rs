//! Three-winding transformer footprint.

use crate::{
    backend::{Backend, Circle},
    footprint::{
        Frame,
        transformer::{RING_OFFSET, RING_RADIUS, STUB_OFFSET},
        winding::{Ring, VectorGroup, draw_mark, plan_three_winding},
    },
    geometry::Point,
};

/// Connection points of a three-winding transformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stubs3w {
    /// Top of the high-voltage ring
    pub high: Point,
    /// Outer side of the left (medium-voltage) ring
    pub medium: Point,
    /// Outer side of the right (low-voltage) ring
    pub low: Point,
}

/// Draws three rings: high voltage on top, medium and low voltage side by
/// side below it, all meeting at `center`.
///
/// The footprint is always drawn upright. Leads leave the high-voltage ring
/// upwards and the lower rings sideways.
pub fn draw_transformer3w(
    backend: &mut dyn Backend,
    center: Point,
    vector_group: Option<&VectorGroup>,
) -> Stubs3w {
    let frame = Frame::at(center);

    for ring in [Ring::Top, Ring::BottomLeft, Ring::BottomRight] {
        backend.circle(Circle::new(frame.map(ring.pole()), RING_RADIUS));
    }

    if let Some(group) = vector_group {
        for mark in plan_three_winding(group) {
            draw_mark(backend, &frame, mark);
        }
    }

    transformer3w_stubs(center)
}

/// Connection stubs of a three-winding transformer, without drawing it.
pub fn transformer3w_stubs(center: Point) -> Stubs3w {
    let frame = Frame::at(center);
    Stubs3w {
        high: frame.point(0.0, STUB_OFFSET),
        medium: frame.point(-(RING_OFFSET + RING_RADIUS), -RING_OFFSET),
        low: frame.point(RING_OFFSET + RING_RADIUS, -RING_OFFSET),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn test_ynyn0_rings_and_glyphs() {
        let group = VectorGroup::parse("YNyn0");
        let mut backend = RecordingBackend::new();
        let stubs = draw_transformer3w(&mut backend, Point::default(), Some(&group));

        assert_eq!(backend.circles().count(), 3);
        assert!(backend.polylines().all(|(_, cycle)| !cycle), "no delta glyphs");

        let top = Ring::Top.pole();
        let left = Ring::BottomLeft.pole();
        let strokes_from = |pole: Point| {
            backend
                .polylines()
                .filter(|(points, _)| points[0].approx_eq(pole, 1e-6))
                .count()
        };
        // wye (3 strokes) plus neutral (1 stroke) on each glyph ring
        assert_eq!(strokes_from(top), 4);
        assert_eq!(strokes_from(left), 4);
        assert_eq!(strokes_from(Ring::BottomRight.pole()), 0);

        assert!(stubs.high.approx_eq(Point::new(0.0, 0.7), 1e-5));
        assert!(stubs.medium.approx_eq(Point::new(-0.7, -0.3), 1e-5));
        assert!(stubs.low.approx_eq(Point::new(0.7, -0.3), 1e-5));
    }
}
