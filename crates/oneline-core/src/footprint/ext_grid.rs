//! External grid footprint: a hatched square above the bus.

use crate::{
    backend::Backend,
    footprint::NODE_RADIUS,
    geometry::Point,
};

/// Half side of the hatched square.
pub const GRID_HALF_SIZE: f32 = 0.5;
/// Gap between the bus and the lead start of the square.
const LEAD_GAP: f32 = 0.5;

/// Draws an external grid infeed above the bus point `bus`.
///
/// Returns the centre of the hatched square.
pub fn draw_ext_grid(backend: &mut dyn Backend, bus: Point) -> Point {
    let d = GRID_HALF_SIZE;
    let base = bus.y() + d * 2.0 + LEAD_GAP;
    let at = |dx: f32, dy: f32| Point::new(bus.x() + dx, base + dy);

    backend.lines(
        &[bus.add_point(Point::new(0.0, NODE_RADIUS)), at(0.0, 0.0)],
        false,
    );
    backend.lines(
        &[at(-d, 0.0), at(-d, d * 2.0), at(d, d * 2.0), at(d, 0.0)],
        true,
    );

    let hatch = [
        (at(-d, 0.0), at(d, d * 2.0)),
        (at(-d, d), at(0.0, d * 2.0)),
        (at(0.0, 0.0), at(d, d)),
        (at(d, 0.0), at(-d, d * 2.0)),
        (at(d, d), at(0.0, d * 2.0)),
        (at(0.0, 0.0), at(-d, d)),
    ];
    for (from, to) in hatch {
        backend.lines(&[from, to], false);
    }

    grid_center(bus)
}

/// Centre of the hatched square above `bus`
pub fn grid_center(bus: Point) -> Point {
    bus.add_point(Point::new(0.0, GRID_HALF_SIZE * 3.0 + LEAD_GAP))
}

/// Anchor of an external grid label, east of the square.
pub fn label_anchor(bus: Point) -> Point {
    grid_center(bus).add_point(Point::new(GRID_HALF_SIZE + NODE_RADIUS, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn test_ext_grid_shape() {
        let mut backend = RecordingBackend::new();
        let center = draw_ext_grid(&mut backend, Point::default());

        assert!(center.approx_eq(Point::new(0.0, 2.0), 1e-6));
        // lead, square, six hatch strokes
        assert_eq!(backend.polylines().count(), 8);
        assert_eq!(backend.polylines().filter(|(_, cycle)| *cycle).count(), 1);
    }
}
