//! Symbol footprints.
//!
//! A footprint is the fixed drawing of one electrical device. Each footprint
//! function is authored in a local, axis-aligned frame, rotated into place by
//! the angle of the connection it sits on, emits its backend calls, and
//! returns the external connection points ([`Stubs`]) that leads attach to.
//!
//! Footprints never draw the leads that connect them to buses; the symbol
//! owning the connection does that, so it can split leads around switches.
//! The exceptions are the single-bus devices (generator, external grid,
//! shunt) whose short drop lead is part of the glyph.

pub mod busbar;
pub mod ext_grid;
pub mod generator;
pub mod node;
pub mod reactor;
pub mod resistor;
pub mod shunt;
pub mod switch;
pub mod transformer;
pub mod transformer3w;
pub mod winding;

use crate::geometry::{Point, rotate};

/// Radius of a bus node; the base unit every footprint is sized from.
pub const NODE_RADIUS: f32 = 0.1;

/// The two external connection points of a two-terminal footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stubs {
    /// Stub facing the start of the connection
    pub start: Point,
    /// Stub facing the end of the connection
    pub end: Point,
}

/// A rotated local coordinate frame.
///
/// Maps local footprint coordinates onto the diagram: the local origin lands
/// on `origin` and the local axes are turned by `angle` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Point,
    angle: f32,
}

impl Frame {
    pub fn new(origin: Point, angle: f32) -> Self {
        Self { origin, angle }
    }

    /// An unrotated frame at `origin`
    pub fn at(origin: Point) -> Self {
        Self::new(origin, 0.0)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Rotation in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Maps the local point `(x, y)` to diagram coordinates
    pub fn point(&self, x: f32, y: f32) -> Point {
        rotate(
            self.origin.add_point(Point::new(x, y)),
            self.origin,
            self.angle,
        )
    }

    /// Maps a local point expressed as a [`Point`]
    pub fn map(&self, local: Point) -> Point {
        self.point(local.x(), local.y())
    }

    /// Returns a frame with the same rotation whose origin is the local
    /// point `(x, y)`
    pub fn shifted(&self, x: f32, y: f32) -> Self {
        Self::new(self.point(x, y), self.angle)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_frame_identity() {
        let frame = Frame::at(Point::new(3.0, 4.0));
        assert_eq!(frame.point(1.0, -1.0), Point::new(4.0, 3.0));
    }

    #[test]
    fn test_frame_rotated() {
        let frame = Frame::new(Point::new(1.0, 1.0), FRAC_PI_2);
        assert!(frame.point(1.0, 0.0).approx_eq(Point::new(1.0, 2.0), 1e-6));
        assert!(frame.point(0.0, 1.0).approx_eq(Point::new(0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_frame_shifted_keeps_rotation() {
        let frame = Frame::new(Point::default(), FRAC_PI_2).shifted(0.0, 2.0);
        assert!(frame.origin().approx_eq(Point::new(-2.0, 0.0), 1e-6));
        assert!(frame.point(1.0, 0.0).approx_eq(Point::new(-2.0, 1.0), 1e-6));
    }
}
