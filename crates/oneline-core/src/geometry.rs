//! Geometric primitives for single-line diagram placement.
//!
//! This module provides the small 2D kernel every footprint is built on:
//! points with basic vector math, rotation about an arbitrary centre, the
//! angle conventions used to lay footprints along a connection, and the
//! nearest-pair search used when two busbars are coupled.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram units
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`rotate`] - Rotation of a point about a centre
//! - [`nearest_pair`] - Closest pair between two point sets
//!
//! # Coordinate System
//!
//! Diagram coordinates follow the drafting convention of the network data:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! - **Y-axis**: Increases upward
//! - **Angles**: Radians, `0` is horizontal, positive is counter-clockwise
//!
//! Backends with a downward Y axis (SVG) flip coordinates when rendering.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use oneline_core::geometry::Point;
/// let p1 = Point::new(4.0, 0.0);
/// let p2 = Point::new(0.0, 0.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 2.0);
/// assert_eq!(p1.distance(p2), 4.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Length of the vector from the origin to this point
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// Returns `None` for the zero vector, which has no direction.
    pub fn unit(self) -> Option<Self> {
        let length = self.hypot();
        if length <= f32::EPSILON {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Unit vector pointing from this point towards `other`.
    pub fn direction_to(self, other: Point) -> Option<Self> {
        other.sub_point(self).unit()
    }

    /// Moves this point `distance` units towards `other`.
    ///
    /// Coincident points have no direction; the point is returned unchanged.
    pub fn towards(self, other: Point, distance: f32) -> Self {
        match self.direction_to(other) {
            Some(unit) => self.add_point(unit.scale(distance)),
            None => self,
        }
    }

    /// Rotates this point about `center` by `angle` radians (counter-clockwise).
    pub fn rotate_about(self, center: Point, angle: f32) -> Self {
        rotate(self, center, angle)
    }

    /// Approximate equality with an absolute tolerance on each coordinate.
    pub fn approx_eq(self, other: Point, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// Rotates `point` about `center` by `angle` radians.
///
/// Applies the standard 2×2 rotation matrix to the offset from `center`.
/// Positive angles rotate counter-clockwise in the Y-up diagram space.
///
/// # Examples
///
/// ```
/// # use oneline_core::geometry::{rotate, Point};
/// let center = Point::new(1.0, 1.0);
/// let rotated = rotate(Point::new(2.0, 1.0), center, std::f32::consts::FRAC_PI_2);
/// assert!(rotated.approx_eq(Point::new(1.0, 2.0), 1e-6));
/// ```
pub fn rotate(point: Point, center: Point, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Angle of the segment `from → to` measured from the +X axis.
///
/// Footprints authored along the X axis (switches) are rotated by this angle.
pub fn direction_angle(from: Point, to: Point) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Rotation that maps the local +Y axis onto the segment `from → to`.
///
/// Footprints authored along the Y axis (transformers, resistors, reactors)
/// are rotated by this angle so their local "up" points at `to`.
pub fn axis_angle(from: Point, to: Point) -> f32 {
    (from.x - to.x).atan2(to.y - from.y)
}

/// Text angle for a label running along `from → to`.
///
/// The direction angle folded into `[-π/2, π/2]`: text follows the slope of
/// the segment but never reads upside down, and a segment with `Δy == 0` is
/// horizontal regardless of its direction.
pub fn reading_angle(from: Point, to: Point) -> f32 {
    let angle = direction_angle(from, to);
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle < -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

/// Finds the pair `(a, b)` with `a ∈ set_a`, `b ∈ set_b` minimising distance.
///
/// Ties keep the first pair found in iteration order. Returns `None` when
/// either set is empty.
///
/// # Examples
///
/// ```
/// # use oneline_core::geometry::{nearest_pair, Point};
/// let left = [Point::new(-2.0, 0.0), Point::new(0.0, 0.0)];
/// let right = [Point::new(1.0, 0.0), Point::new(3.0, 0.0)];
///
/// let (a, b) = nearest_pair(&left, &right).unwrap();
/// assert_eq!(a, Point::new(0.0, 0.0));
/// assert_eq!(b, Point::new(1.0, 0.0));
/// ```
pub fn nearest_pair(set_a: &[Point], set_b: &[Point]) -> Option<(Point, Point)> {
    let mut best: Option<(Point, Point, f32)> = None;
    for &a in set_a {
        for &b in set_b {
            let distance = a.distance(b);
            if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
                best = Some((a, b, distance));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a zero-sized bounds located at `point`
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Creates bounds of a square with half-side `radius` around `center`
    pub fn around(center: Point, radius: f32) -> Self {
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Merges two bounds into the smallest bounds containing both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds so that it contains `point`.
    pub fn include(&self, point: Point) -> Self {
        self.merge(&Self::from_point(point))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use float_cmp::{approx_eq, assert_approx_eq};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_point_unit() {
        let unit = Point::new(0.0, -2.0).unit().unwrap();
        assert_approx_eq!(f32, unit.x(), 0.0);
        assert_approx_eq!(f32, unit.y(), -1.0);

        assert!(Point::default().unit().is_none());
    }

    #[test]
    fn test_point_towards() {
        let moved = Point::new(0.0, 0.0).towards(Point::new(4.0, 0.0), 0.6);
        assert_approx_eq!(f32, moved.x(), 0.6);
        assert_approx_eq!(f32, moved.y(), 0.0);

        let same = Point::new(1.0, 1.0).towards(Point::new(1.0, 1.0), 3.0);
        assert_eq!(same, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate(Point::new(1.0, 0.0), Point::default(), FRAC_PI_2);
        assert!(rotated.approx_eq(Point::new(0.0, 1.0), 1e-6));

        let rotated = rotate(Point::new(3.0, 2.0), Point::new(2.0, 2.0), PI);
        assert!(rotated.approx_eq(Point::new(1.0, 2.0), 1e-6));
    }

    #[test]
    fn test_direction_angle() {
        let o = Point::default();
        assert_approx_eq!(f32, direction_angle(o, Point::new(1.0, 0.0)), 0.0);
        assert_approx_eq!(f32, direction_angle(o, Point::new(0.0, 1.0)), FRAC_PI_2);
        assert_approx_eq!(f32, direction_angle(o, Point::new(-1.0, 0.0)), PI);
    }

    #[test]
    fn test_axis_angle_maps_up_onto_segment() {
        let from = Point::new(1.0, 1.0);
        for to in [
            Point::new(1.0, 5.0),
            Point::new(4.0, 1.0),
            Point::new(-2.0, -3.0),
        ] {
            let angle = axis_angle(from, to);
            let up = rotate(Point::new(0.0, 1.0), Point::default(), angle);
            let expected = from.direction_to(to).unwrap();
            assert!(up.approx_eq(expected, 1e-5), "{to:?}: {up:?}");
        }
    }

    #[test]
    fn test_reading_angle_is_horizontal_for_flat_segments() {
        let a = Point::new(4.0, 2.0);
        let b = Point::new(0.0, 2.0);
        assert_approx_eq!(f32, reading_angle(a, b), 0.0);
        assert_approx_eq!(f32, reading_angle(b, a), 0.0);
    }

    #[test]
    fn test_reading_angle_never_upside_down() {
        let angle = reading_angle(Point::new(4.0, 4.0), Point::new(0.0, 0.0));
        assert!(angle.abs() <= FRAC_PI_2 + 1e-6);
        assert_approx_eq!(f32, angle, PI / 4.0, epsilon = 1e-6);

        // right-to-left descent keeps its slope
        let angle = reading_angle(Point::new(4.0, 0.0), Point::new(0.0, 4.0));
        assert_approx_eq!(f32, angle, -PI / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_nearest_pair_between_busbar_ends() {
        let bus_a = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
        let bus_b = [Point::new(10.0, 0.0), Point::new(5.0, 0.0)];

        let (a, b) = nearest_pair(&bus_a, &bus_b).unwrap();
        assert_eq!(a, Point::new(4.0, 0.0));
        assert_eq!(b, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_nearest_pair_keeps_first_tie() {
        let set_a = [Point::new(0.0, 1.0), Point::new(0.0, -1.0)];
        let set_b = [Point::new(0.0, 0.0)];

        let (a, _) = nearest_pair(&set_a, &set_b).unwrap();
        assert_eq!(a, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_nearest_pair_empty() {
        assert!(nearest_pair(&[], &[Point::default()]).is_none());
        assert!(nearest_pair(&[Point::default()], &[]).is_none());
    }

    #[test]
    fn test_bounds_include() {
        let bounds = Bounds::from_point(Point::new(1.0, 1.0))
            .include(Point::new(-1.0, 3.0))
            .include(Point::new(2.0, 0.0));

        assert_eq!(bounds.min_x(), -1.0);
        assert_eq!(bounds.min_y(), 0.0);
        assert_eq!(bounds.max_x(), 2.0);
        assert_eq!(bounds.max_y(), 3.0);
        assert_eq!(bounds.width(), 3.0);
        assert_eq!(bounds.height(), 3.0);
    }

    #[test]
    fn test_bounds_around() {
        let bounds = Bounds::around(Point::new(2.0, 2.0), 0.5);
        assert_eq!(bounds.center(), Point::new(2.0, 2.0));
        assert_eq!(bounds.width(), 1.0);
    }

    // ===================
    // Property Test Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn angle_strategy() -> impl Strategy<Value = f32> {
        -2.0 * PI..2.0 * PI
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A point rotated about itself never moves.
    fn check_rotate_about_self_is_identity(p: Point, angle: f32) -> Result<(), TestCaseError> {
        let rotated = rotate(p, p, angle);
        prop_assert_eq!(rotated, p);
        Ok(())
    }

    /// Rotating forth and back returns to the starting point.
    fn check_rotate_roundtrip(p: Point, center: Point, angle: f32) -> Result<(), TestCaseError> {
        let back = rotate(rotate(p, center, angle), center, -angle);
        prop_assert!(approx_eq!(f32, back.x(), p.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, back.y(), p.y(), epsilon = 0.01));
        Ok(())
    }

    /// Rotation preserves the distance to the centre.
    fn check_rotate_preserves_radius(
        p: Point,
        center: Point,
        angle: f32,
    ) -> Result<(), TestCaseError> {
        let rotated = rotate(p, center, angle);
        prop_assert!(approx_eq!(
            f32,
            rotated.distance(center),
            p.distance(center),
            epsilon = 0.01
        ));
        Ok(())
    }

    /// No pair across the two sets is closer than the reported one.
    fn check_nearest_pair_is_minimal(
        set_a: Vec<Point>,
        set_b: Vec<Point>,
    ) -> Result<(), TestCaseError> {
        let (a, b) = nearest_pair(&set_a, &set_b).expect("non-empty sets");
        let best = a.distance(b);
        for p in &set_a {
            for q in &set_b {
                prop_assert!(best <= p.distance(*q));
            }
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn rotate_about_self_is_identity(p in point_strategy(), angle in angle_strategy()) {
            check_rotate_about_self_is_identity(p, angle)?;
        }

        #[test]
        fn rotate_roundtrip(
            p in point_strategy(),
            center in point_strategy(),
            angle in angle_strategy(),
        ) {
            check_rotate_roundtrip(p, center, angle)?;
        }

        #[test]
        fn rotate_preserves_radius(
            p in point_strategy(),
            center in point_strategy(),
            angle in angle_strategy(),
        ) {
            check_rotate_preserves_radius(p, center, angle)?;
        }

        #[test]
        fn nearest_pair_is_minimal(
            set_a in prop::collection::vec(point_strategy(), 1..6),
            set_b in prop::collection::vec(point_strategy(), 1..6),
        ) {
            check_nearest_pair_is_minimal(set_a, set_b)?;
        }
    }
}
