//! Shunt footprints: capacitor or reactor to ground.

use crate::{
    backend::Backend,
    footprint::{
        NODE_RADIUS,
        reactor::{REACTOR_RADIUS, draw_reactor},
    },
    geometry::Point,
};

/// Depth of the upper capacitor plate below the bus.
const PLATE_DEPTH: f32 = NODE_RADIUS * 7.0;
/// Half width of a capacitor plate.
const PLATE_HALF_WIDTH: f32 = NODE_RADIUS * 5.0;
/// Depth of the ground symbol below the bus.
const GROUND_DEPTH: f32 = PLATE_DEPTH * 2.0 + NODE_RADIUS;

/// Kind of compensation a shunt provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuntKind {
    Capacitive,
    Inductive,
}

impl ShuntKind {
    /// Chooses the symbol from the reactive power a shunt consumes.
    ///
    /// Negative consumption is capacitive; anything else is drawn as an
    /// inductive reactor.
    pub fn from_reactive_power(q_mvar: f64) -> Self {
        if q_mvar < 0.0 {
            Self::Capacitive
        } else {
            Self::Inductive
        }
    }
}

/// Draws three shrinking strokes, the widest at `top`.
pub fn draw_ground(backend: &mut dyn Backend, top: Point) {
    for (step, half_width) in [3.0, 2.0, 1.0].into_iter().enumerate() {
        let y = top.y() - NODE_RADIUS * step as f32;
        let w = NODE_RADIUS * half_width;
        backend.lines(
            &[Point::new(top.x() - w, y), Point::new(top.x() + w, y)],
            false,
        );
    }
}

/// Anchor of a shunt label, right of the drop lead.
pub fn label_anchor(bus: Point) -> Point {
    bus.add_point(Point::new(NODE_RADIUS * 2.0, -NODE_RADIUS))
}

/// Draws a shunt hanging below the bus point `bus`, terminated by ground.
pub fn draw_shunt(backend: &mut dyn Backend, bus: Point, kind: ShuntKind) {
    let below = |depth: f32| bus.add_point(Point::new(0.0, -depth));
    let ground = below(GROUND_DEPTH);

    match kind {
        ShuntKind::Capacitive => {
            let upper = PLATE_DEPTH;
            let lower = PLATE_DEPTH + NODE_RADIUS;
            let w = PLATE_HALF_WIDTH;

            backend.lines(&[below(NODE_RADIUS), below(upper)], false);
            backend.lines(&[below(lower), ground], false);
            for depth in [upper, lower] {
                let plate = below(depth);
                backend.lines(
                    &[
                        plate.add_point(Point::new(-w, 0.0)),
                        plate.add_point(Point::new(w, 0.0)),
                    ],
                    false,
                );
            }
        }
        ShuntKind::Inductive => {
            let center = below(GROUND_DEPTH - REACTOR_RADIUS * 1.5);
            let stubs = draw_reactor(backend, center, 0.0);
            backend.lines(&[below(NODE_RADIUS), stubs.start], false);
            backend.lines(&[stubs.end, ground], false);
        }
    }

    draw_ground(backend, ground);
}
