//! Abstract drawing backend.
//!
//! The diagram core never renders pixels itself. Every footprint emits a
//! short sequence of calls against the [`Backend`] trait, which is the whole
//! contract between the layout engine and an output format:
//!
//! - [`Backend::circle`] - full circle or arc, optionally filled
//! - [`Backend::lines`] - open polyline or closed polygon
//! - [`Backend::label`] - one row of rotated, anchored text
//! - [`Backend::save`] - persist the finished drawing
//!
//! [`RecordingBackend`] captures the calls as [`DrawCall`] values. It is the
//! test double for geometry assertions and a convenient way to post-process a
//! drawing.

use std::{fmt, io, str::FromStr};

use thiserror::Error;

use crate::geometry::Point;

/// Where a label sits relative to its anchor point.
///
/// `E` places the text to the east of the point (left-aligned at the point),
/// `N` places it above, `C` centres it on the point, and so on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
    #[default]
    C,
}

impl Place {
    /// Returns the compass name of this placement
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
            Self::C => "c",
        }
    }

    /// True when the text extends to the east of the anchor
    pub fn is_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    /// True when the text extends to the west of the anchor
    pub fn is_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    /// True when the text sits above the anchor
    pub fn is_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    /// True when the text hangs below the anchor
    pub fn is_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }
}

impl FromStr for Place {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Self::N),
            "s" => Ok(Self::S),
            "e" => Ok(Self::E),
            "w" => Ok(Self::W),
            "ne" => Ok(Self::NE),
            "nw" => Ok(Self::NW),
            "se" => Ok(Self::SE),
            "sw" => Ok(Self::SW),
            "c" => Ok(Self::C),
            _ => Err(format!("unknown label placement `{s}`")),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Angular extent of an arc, in degrees, swept counter-clockwise from
/// `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f32,
    pub end: f32,
}

impl ArcSpan {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Swept angle in degrees, normalised to `(0, 360]`
    pub fn sweep(self) -> f32 {
        let sweep = (self.end - self.start).rem_euclid(360.0);
        if sweep == 0.0 { 360.0 } else { sweep }
    }

    /// Returns the span rotated by `degrees`
    pub fn rotated(self, degrees: f32) -> Self {
        Self {
            start: self.start + degrees,
            end: self.end + degrees,
        }
    }
}

/// A circle or circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub arc: Option<ArcSpan>,
    pub filled: bool,
}

impl Circle {
    /// An outlined full circle
    pub fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius,
            arc: None,
            filled: false,
        }
    }

    /// Returns the circle as a solid disc
    pub fn filled(mut self) -> Self {
        self.filled = true;
        self
    }

    /// Restricts the circle to an arc
    pub fn with_arc(mut self, arc: ArcSpan) -> Self {
        self.arc = Some(arc);
        self
    }
}

/// One row of text anchored at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point,
    pub text: String,
    pub size: f32,
    pub place: Place,
    /// Rotation in degrees, counter-clockwise
    pub angle: f32,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>, size: f32) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            place: Place::C,
            angle: 0.0,
        }
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.place = place;
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }
}

/// Errors raised while persisting a drawing.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

/// Drawing surface consumed by the footprint library.
///
/// Implementors receive absolute diagram coordinates (Y up) and decide how
/// to map them onto their output.
pub trait Backend {
    /// Draws a circle or arc.
    fn circle(&mut self, circle: Circle);

    /// Draws a polyline through `points`; closes it into a polygon when
    /// `cycle` is set.
    fn lines(&mut self, points: &[Point], cycle: bool);

    /// Draws one label row.
    fn label(&mut self, label: Label);

    /// Persists the finished drawing.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the output cannot be produced or written.
    fn save(&mut self) -> Result<(), BackendError>;
}

/// A single recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Circle(Circle),
    Lines { points: Vec<Point>, cycle: bool },
    Label(Label),
    Save,
}

/// Backend that records every call in order.
///
/// # Examples
///
/// ```
/// # use oneline_core::backend::{Backend, RecordingBackend};
/// # use oneline_core::geometry::Point;
/// let mut backend = RecordingBackend::new();
/// backend.lines(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0)], false);
///
/// assert_eq!(backend.polylines().count(), 1);
/// assert!(!backend.is_saved());
/// ```
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Consumes the recorder and returns the recorded calls
    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    /// Recorded circles and arcs
    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    /// Recorded polylines as `(points, cycle)`
    pub fn polylines(&self) -> impl Iterator<Item = (&[Point], bool)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Lines { points, cycle } => Some((points.as_slice(), *cycle)),
            _ => None,
        })
    }

    /// Recorded label rows
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Label(label) => Some(label),
            _ => None,
        })
    }

    /// True once [`Backend::save`] has been called
    pub fn is_saved(&self) -> bool {
        self.calls.iter().any(|call| matches!(call, DrawCall::Save))
    }
}

impl Backend for RecordingBackend {
    fn circle(&mut self, circle: Circle) {
        self.calls.push(DrawCall::Circle(circle));
    }

    fn lines(&mut self, points: &[Point], cycle: bool) {
        self.calls.push(DrawCall::Lines {
            points: points.to_vec(),
            cycle,
        });
    }

    fn label(&mut self, label: Label) {
        self.calls.push(DrawCall::Label(label));
    }

    fn save(&mut self) -> Result<(), BackendError> {
        self.calls.push(DrawCall::Save);
        Ok(())
    }
}
