//! Connection routes.
//!
//! A [`Route`] is the polyline a connection follows between two bus points.
//! The owner of a connection uses it to place switches at a fixed distance
//! from either end and then to split the conductor into the pieces that run
//! between the bus points and the switch stubs.

use crate::{
    footprint::Stubs,
    geometry::{Point, direction_angle},
};

/// A polyline with at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Point>,
}

impl Route {
    /// Creates a route through `points`.
    ///
    /// Consecutive duplicate points are merged. Returns `None` when fewer
    /// than two distinct points remain.
    pub fn new(mut points: Vec<Point>) -> Option<Self> {
        points.dedup();
        (points.len() >= 2).then_some(Self { points })
    }

    /// A single straight segment
    pub fn straight(start: Point, end: Point) -> Self {
        Self {
            points: vec![start, end],
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Total length of all segments
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point `distance` from the start, along the first segment.
    ///
    /// The distance is clamped to half the segment length.
    pub fn from_start(&self, distance: f32) -> Point {
        let next = self.points[1];
        let half = self.start().distance(next) / 2.0;
        self.start().towards(next, distance.min(half))
    }

    /// Point `distance` from the end, along the last segment.
    ///
    /// The distance is clamped to half the segment length.
    pub fn from_end(&self, distance: f32) -> Point {
        let previous = self.points[self.points.len() - 2];
        let half = self.end().distance(previous) / 2.0;
        self.end().towards(previous, distance.min(half))
    }

    /// Direction of the route leaving its start
    pub fn start_angle(&self) -> f32 {
        direction_angle(self.start(), self.points[1])
    }

    /// Direction of the route leaving its end, back into the route
    pub fn end_angle(&self) -> f32 {
        direction_angle(self.end(), self.points[self.points.len() - 2])
    }

    /// Segment `index` as `(start, end)`
    pub fn segment(&self, index: usize) -> (Point, Point) {
        (self.points[index], self.points[index + 1])
    }

    /// The point halfway along the route and the index of its segment
    pub fn halfway(&self) -> (Point, usize) {
        let mut remaining = self.length() / 2.0;
        for (index, w) in self.points.windows(2).enumerate() {
            let length = w[0].distance(w[1]);
            if remaining <= length {
                return (w[0].towards(w[1], remaining), index);
            }
            remaining -= length;
        }
        (self.end(), self.points.len() - 2)
    }

    /// Cuts the route at a footprint sitting on segment `index`.
    ///
    /// Returns the polyline from the route start to `gap.start` and the
    /// polyline from `gap.end` to the route end.
    pub fn cut(&self, index: usize, gap: Stubs) -> (Vec<Point>, Vec<Point>) {
        let mut before = self.points[..=index].to_vec();
        before.push(gap.start);
        let mut after = vec![gap.end];
        after.extend_from_slice(&self.points[index + 1..]);
        (before, after)
    }

    /// Splits the route around switches sitting at its ends.
    ///
    /// Each `Stubs` pair belongs to a switch drawn with its `start` stub
    /// facing the route end it sits on. A switch at the start produces a
    /// short piece from the start point to its near stub and moves the main
    /// conductor to begin at its far stub; the end is handled the same way.
    ///
    /// Every returned piece is drawn exactly once by the route owner.
    pub fn split(&self, at_start: Option<Stubs>, at_end: Option<Stubs>) -> Vec<Vec<Point>> {
        let mut pieces = Vec::with_capacity(3);
        let mut main = self.points.clone();

        if let Some(stubs) = at_start {
            pieces.push(vec![self.start(), stubs.start]);
            main[0] = stubs.end;
        }

        let last = main.len() - 1;
        let mut tail = None;
        if let Some(stubs) = at_end {
            tail = Some(vec![stubs.start, self.end()]);
            main[last] = stubs.end;
        }

        pieces.push(main);
        pieces.extend(tail);
        pieces
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn stubs(start: (f32, f32), end: (f32, f32)) -> Stubs {
        Stubs {
            start: Point::new(start.0, start.1),
            end: Point::new(end.0, end.1),
        }
    }

    #[test]
    fn test_new_requires_two_points() {
        assert!(Route::new(vec![Point::default()]).is_none());
        assert!(Route::new(vec![Point::default(), Point::new(1.0, 0.0)]).is_some());
        assert!(Route::new(vec![Point::default(), Point::default()]).is_none());

        let route = Route::new(vec![
            Point::default(),
            Point::default(),
            Point::new(1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(route.points().len(), 2);
    }

    #[test]
    fn test_offsets_from_ends() {
        let route = Route::straight(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
        assert!(route.from_start(0.6).approx_eq(Point::new(0.6, 0.0), 1e-6));
        assert!(route.from_end(0.6).approx_eq(Point::new(3.4, 0.0), 1e-6));
        assert_approx_eq!(f32, route.start_angle(), 0.0);
        assert_approx_eq!(f32, route.end_angle().abs(), std::f32::consts::PI);
    }

    #[test]
    fn test_offsets_stay_within_short_end_segments() {
        let route = Route::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.4, 0.0),
            Point::new(0.4, 5.0),
            Point::new(0.4, 5.2),
        ])
        .unwrap();

        assert!(route.from_start(0.6).approx_eq(Point::new(0.2, 0.0), 1e-6));
        assert!(route.from_end(0.6).approx_eq(Point::new(0.4, 5.1), 1e-5));
    }

    #[test]
    fn test_halfway_on_bent_route() {
        let route = Route::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 4.0),
        ])
        .unwrap();

        let (mid, index) = route.halfway();
        assert!(mid.approx_eq(Point::new(2.0, 1.0), 1e-6));
        assert_eq!(index, 1);
        assert_eq!(route.segment(index).1, Point::new(2.0, 4.0));
    }

    #[test]
    fn test_cut_around_footprint() {
        let route = Route::straight(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
        let (before, after) = route.cut(0, stubs((1.7, 0.0), (2.3, 0.0)));

        assert_eq!(before, vec![Point::new(0.0, 0.0), Point::new(1.7, 0.0)]);
        assert_eq!(after, vec![Point::new(2.3, 0.0), Point::new(4.0, 0.0)]);
    }

    #[test]
    fn test_split_without_switches() {
        let route = Route::straight(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
        let pieces = route.split(None, None);
        assert_eq!(pieces, vec![vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)]]);
    }

    #[test]
    fn test_split_switch_at_start() {
        let route = Route::straight(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
        let pieces = route.split(Some(stubs((0.4, 0.0), (0.8, 0.0))), None);

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], vec![Point::new(0.0, 0.0), Point::new(0.4, 0.0)]);
        assert_eq!(pieces[1], vec![Point::new(0.8, 0.0), Point::new(4.0, 0.0)]);
    }

    #[test]
    fn test_split_switches_at_both_ends() {
        let route = Route::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(4.0, 0.0),
        ])
        .unwrap();
        let pieces = route.split(
            Some(stubs((0.4, 0.0), (0.8, 0.0))),
            Some(stubs((3.6, 0.0), (3.2, 0.0))),
        );

        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1][0], Point::new(0.8, 0.0));
        assert_eq!(pieces[1][1], Point::new(2.0, 1.0));
        assert_eq!(pieces[1][2], Point::new(3.2, 0.0));
        assert_eq!(pieces[2], vec![Point::new(3.6, 0.0), Point::new(4.0, 0.0)]);
    }
}
