//! Text wrapping and multi-row label placement.
//!
//! Component names in network data are long ("Substation 2 feeder-3
//! cable_A"), while the room next to a symbol is a few characters wide. This
//! module breaks such strings into rows at separator characters and stacks
//! the rows next to an anchor, rotated with the symbol they annotate.
//!
//! - [`split_str`] - greedy row splitting at separators
//! - [`TextBlock`] - rows + anchor + angle, drawn through a [`Backend`]

use log::trace;

use crate::{
    backend::{Backend, Label, Place},
    geometry::{Point, rotate},
};

/// Default label text height in diagram units.
pub const TEXT_SIZE: f32 = 0.2;

/// Row pitch as a multiple of the text height.
pub const ROW_SPACING: f32 = 1.2;

/// Characters a row may be broken at.
pub const SEPARATORS: [char; 5] = [' ', ',', '.', '-', '_'];

/// Row length meaning "never wrap".
pub const NO_WRAP: usize = usize::MAX;

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Splits `text` into rows of at most `max_len` characters.
///
/// While the remaining text is longer than `max_len`:
/// - if the character at offset `max_len` is a separator, the row ends just
///   before it (the separator starts the next row);
/// - otherwise the nearest separator at an offset in `2..max_len` is
///   searched right-to-left and the row ends just after it;
/// - if there is none, the row is force-cut at `max_len` characters.
///
/// Concatenating the rows always reproduces `text`. A `max_len` of zero
/// disables wrapping.
///
/// # Examples
///
/// ```
/// # use oneline_core::text::split_str;
/// assert_eq!(
///     split_str("123 4567-89.123456789,", 8),
///     ["123 4567", "-89.", "12345678", "9,"],
/// );
/// ```
pub fn split_str(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut rows = Vec::new();
    let mut start = 0;

    while chars.len() - start > max_len {
        let rest = &chars[start..];
        let cut = if is_separator(rest[max_len]) {
            max_len
        } else {
            let mut n = max_len - 1;
            while !is_separator(rest[n]) && n > 1 {
                n -= 1;
            }
            if n == 1 {
                n = max_len - 1;
            }
            n + 1
        };
        rows.push(rest[..cut].iter().collect());
        start += cut;
    }

    rows.push(chars[start..].iter().collect());
    rows
}

/// Direction successive rows are stacked in, relative to the text baseline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Later rows are drawn above earlier ones
    #[default]
    Up,
    /// Later rows are drawn below earlier ones
    Down,
}

/// A multi-row label owned by a symbol.
///
/// Rows longer than `max_len` are wrapped with [`split_str`] at draw time.
/// The first logical row is drawn at the anchor; the following rows stack
/// perpendicular to the baseline, in the symbol's rotated frame. Pieces of a
/// wrapped row are emitted in reverse, so with upward growth the first piece
/// ends up on top and the row reads naturally.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    rows: Vec<String>,
    anchor: Point,
    angle: f32,
    max_len: usize,
    size: f32,
    place: Place,
    growth: Growth,
}

impl TextBlock {
    /// Creates a horizontal, centred, unwrapped block at `anchor`
    pub fn new(rows: Vec<String>, anchor: Point) -> Self {
        Self {
            rows,
            anchor,
            angle: 0.0,
            max_len: NO_WRAP,
            size: TEXT_SIZE,
            place: Place::C,
            growth: Growth::Up,
        }
    }

    /// Moves the block to a new anchor
    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the rotation in radians
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the maximum row length
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Sets the text height
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.place = place;
        self
    }

    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Rotation in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Text height
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn place(&self) -> Place {
        self.place
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// Vertical distance between two rows
    pub fn row_height(&self) -> f32 {
        self.size * ROW_SPACING
    }

    /// Computes every physical row with its absolute draw position.
    ///
    /// Empty rows still advance the stacking offset but are not returned.
    pub fn layout(&self) -> Vec<(Point, String)> {
        let step = match self.growth {
            Growth::Up => self.row_height(),
            Growth::Down => -self.row_height(),
        };

        let mut placed = Vec::new();
        let mut offset = 0.0;
        for row in &self.rows {
            let mut pieces = split_str(row, self.max_len);
            pieces.reverse();
            for piece in pieces {
                let unrotated = self.anchor.add_point(Point::new(0.0, offset));
                let position = rotate(unrotated, self.anchor, self.angle);
                if !piece.is_empty() {
                    placed.push((position, piece));
                }
                offset += step;
            }
        }
        placed
    }

    /// Emits one backend label per physical row.
    pub fn draw(&self, backend: &mut dyn Backend) {
        let degrees = self.angle.to_degrees();
        for (position, text) in self.layout() {
            trace!(text = text.as_str(), x = position.x(), y = position.y(); "Placing label row");
            backend.label(
                Label::new(position, text, self.size)
                    .with_place(self.place)
                    .with_angle(degrees),
            );
        }
    }
}
