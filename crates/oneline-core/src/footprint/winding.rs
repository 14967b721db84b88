//! Vector-group winding marks.
//!
//! An IEC vector group such as `Dyn11` or `YNyn0` names the winding
//! connection of each transformer side: uppercase letters belong to the high
//! voltage side, lowercase letters to the low voltage side(s), and trailing
//! digits give the phase displacement as a clock number.
//!
//! [`VectorGroup::parse`] turns the code into a list of [`WindingLetter`]s.
//! The planners ([`plan_two_winding`], [`plan_three_winding`]) decide which
//! ring each letter is drawn on and produce a list of [`Mark`]s, and
//! [`draw_mark`] renders a single mark through a footprint [`Frame`].
//!
//! On a three-winding transformer both low-voltage rings receive lowercase
//! letters. A [`LowSideCursor`] alternates winding glyphs between the left
//! and right rings so two windings of the same family never overlap, and
//! keeps the neutral marker on the ring of the winding it belongs to.

use std::{convert::Infallible, fmt, str::FromStr};

use log::warn;

use crate::{
    backend::Backend,
    footprint::{
        Frame, NODE_RADIUS,
        transformer::{RING_OFFSET, RING_RADIUS},
    },
    geometry::Point,
};

/// Half width of a winding glyph.
const GLYPH_HALF_WIDTH: f32 = NODE_RADIUS * 2.0;

/// Winding connection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Delta,
    Wye,
    /// Accessible neutral point
    Neutral,
}

/// Which side of the transformer a letter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voltage {
    High,
    Low,
}

/// One winding letter of a vector group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindingLetter {
    pub voltage: Voltage,
    pub winding: Winding,
}

impl WindingLetter {
    fn from_char(c: char) -> Option<Self> {
        let winding = match c.to_ascii_uppercase() {
            'D' => Winding::Delta,
            'Y' => Winding::Wye,
            'N' => Winding::Neutral,
            _ => return None,
        };
        let voltage = if c.is_ascii_uppercase() {
            Voltage::High
        } else {
            Voltage::Low
        };
        Some(Self { voltage, winding })
    }
}

/// A parsed vector group code.
///
/// # Examples
///
/// ```
/// # use oneline_core::footprint::winding::{VectorGroup, Voltage, Winding};
/// let group = VectorGroup::parse("Dyn11");
///
/// assert_eq!(group.letters().len(), 3);
/// assert_eq!(group.letters()[0].voltage, Voltage::High);
/// assert_eq!(group.letters()[2].winding, Winding::Neutral);
/// assert_eq!(group.clock(), Some(11));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorGroup {
    code: String,
    letters: Vec<WindingLetter>,
    clock: Option<u8>,
}

impl VectorGroup {
    /// Parses a vector group code.
    ///
    /// Parsing never fails: characters that are neither winding letters nor
    /// digits are logged and skipped, and a clock number that does not fit
    /// is dropped.
    pub fn parse(code: &str) -> Self {
        let mut letters = Vec::new();
        let mut digits = String::new();

        for c in code.chars() {
            if let Some(letter) = WindingLetter::from_char(c) {
                letters.push(letter);
            } else if c.is_ascii_digit() {
                digits.push(c);
            } else if !c.is_whitespace() {
                warn!(code, character:% = c; "Skipping unknown vector group character");
            }
        }

        let clock = if digits.is_empty() {
            None
        } else {
            match digits.parse::<u8>() {
                Ok(clock) => Some(clock),
                Err(_) => {
                    warn!(code, digits = digits.as_str(); "Ignoring out of range clock number");
                    None
                }
            }
        };

        Self {
            code: code.to_string(),
            letters,
            clock,
        }
    }

    /// The code as given
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Winding letters in code order
    pub fn letters(&self) -> &[WindingLetter] {
        &self.letters
    }

    /// Phase displacement clock number, if the code carries one
    pub fn clock(&self) -> Option<u8> {
        self.clock
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl FromStr for VectorGroup {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for VectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// A transformer ring that can carry winding glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ring {
    /// High voltage ring
    Top,
    /// Low voltage ring of a two-winding transformer
    Bottom,
    /// Medium voltage ring of a three-winding transformer
    BottomLeft,
    /// Low voltage ring of a three-winding transformer
    BottomRight,
}

impl Ring {
    /// Centre of the ring in the transformer's local frame
    pub fn pole(self) -> Point {
        match self {
            Self::Top => Point::new(0.0, RING_OFFSET),
            Self::Bottom => Point::new(0.0, -RING_OFFSET),
            Self::BottomLeft => Point::new(-RING_OFFSET, -RING_OFFSET),
            Self::BottomRight => Point::new(RING_OFFSET, -RING_OFFSET),
        }
    }

    /// Radius shared by all rings
    pub fn radius(self) -> f32 {
        RING_RADIUS
    }
}

/// A winding glyph placed on a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mark {
    pub ring: Ring,
    pub winding: Winding,
}

/// Left or right low-voltage ring of a three-winding transformer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn ring(self) -> Ring {
        match self {
            Self::Left => Ring::BottomLeft,
            Self::Right => Ring::BottomRight,
        }
    }
}

/// Placement state for lowercase letters on a three-winding transformer.
///
/// `winding` is the side the next delta or wye goes to, `neutral` the side
/// the next neutral marker goes to. Both start on the left. Each winding
/// glyph flips `winding`; each neutral flips `neutral`. When a winding glyph
/// is about to land on the right while the neutral cursor still points left,
/// the neutral cursor catches up so a following `n` joins that winding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LowSideCursor {
    winding: Side,
    neutral: Side,
}

impl LowSideCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winding_side(&self) -> Side {
        self.winding
    }

    pub fn neutral_side(&self) -> Side {
        self.neutral
    }

    /// Places one low-voltage glyph and advances the cursor
    pub fn place(self, winding: Winding) -> (Self, Mark) {
        match winding {
            Winding::Neutral => {
                let mark = Mark {
                    ring: self.neutral.ring(),
                    winding,
                };
                let next = Self {
                    neutral: self.neutral.flipped(),
                    ..self
                };
                (next, mark)
            }
            Winding::Delta | Winding::Wye => {
                let neutral = if self.winding == Side::Right && self.neutral == Side::Left {
                    Side::Right
                } else {
                    self.neutral
                };
                let mark = Mark {
                    ring: self.winding.ring(),
                    winding,
                };
                let next = Self {
                    winding: self.winding.flipped(),
                    neutral,
                };
                (next, mark)
            }
        }
    }
}

/// Plans the glyphs of a two-winding transformer.
///
/// High-voltage letters go on the top ring and low-voltage letters on the
/// bottom ring, in code order.
pub fn plan_two_winding(group: &VectorGroup) -> Vec<Mark> {
    group
        .letters()
        .iter()
        .map(|letter| Mark {
            ring: match letter.voltage {
                Voltage::High => Ring::Top,
                Voltage::Low => Ring::Bottom,
            },
            winding: letter.winding,
        })
        .collect()
}

/// Plans the glyphs of a three-winding transformer.
///
/// High-voltage letters go on the top ring; low-voltage letters are folded
/// through a [`LowSideCursor`].
pub fn plan_three_winding(group: &VectorGroup) -> Vec<Mark> {
    group
        .letters()
        .iter()
        .scan(LowSideCursor::new(), |cursor, letter| {
            let mark = match letter.voltage {
                Voltage::High => Mark {
                    ring: Ring::Top,
                    winding: letter.winding,
                },
                Voltage::Low => {
                    let (next, mark) = cursor.place(letter.winding);
                    *cursor = next;
                    mark
                }
            };
            Some(mark)
        })
        .collect()
}

/// Draws one winding glyph at its ring's pole.
pub fn draw_mark(backend: &mut dyn Backend, frame: &Frame, mark: Mark) {
    let pole = frame.shifted(mark.ring.pole().x(), mark.ring.pole().y());
    let w = GLYPH_HALF_WIDTH;
    let r = NODE_RADIUS;

    match mark.winding {
        Winding::Delta => {
            backend.lines(
                &[pole.point(-w, -r), pole.point(w, -r), pole.point(0.0, w)],
                true,
            );
        }
        Winding::Wye => {
            let center = pole.origin();
            backend.lines(&[center, pole.point(0.0, w)], false);
            backend.lines(&[center, pole.point(-w, -r)], false);
            backend.lines(&[center, pole.point(w, -r)], false);
        }
        Winding::Neutral => {
            backend.lines(&[pole.origin(), pole.point(w, 0.0)], false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    fn count(marks: &[Mark], ring: Ring, winding: Winding) -> usize {
        marks
            .iter()
            .filter(|mark| mark.ring == ring && mark.winding == winding)
            .count()
    }

    #[test]
    fn test_parse_letters_and_clock() {
        let group = VectorGroup::parse("YNyn0");
        assert_eq!(group.letters().len(), 4);
        assert_eq!(group.clock(), Some(0));
        assert_eq!(
            group.letters()[1],
            WindingLetter {
                voltage: Voltage::High,
                winding: Winding::Neutral
            }
        );
        assert_eq!(group.to_string(), "YNyn0");
    }

    #[test]
    fn test_parse_skips_unknown_characters() {
        let group = VectorGroup::parse("Dx?y 5");
        assert_eq!(group.letters().len(), 2);
        assert_eq!(group.clock(), Some(5));
    }

    #[test]
    fn test_parse_empty() {
        let group: VectorGroup = "".parse().unwrap();
        assert!(group.is_empty());
        assert_eq!(group.clock(), None);
    }

    #[test]
    fn test_dyn11_two_winding() {
        let marks = plan_two_winding(&VectorGroup::parse("Dyn11"));

        assert_eq!(marks.len(), 3);
        assert_eq!(count(&marks, Ring::Top, Winding::Delta), 1);
        assert_eq!(count(&marks, Ring::Bottom, Winding::Wye), 1);
        assert_eq!(count(&marks, Ring::Bottom, Winding::Neutral), 1);
    }

    #[test]
    fn test_ynyn0_three_winding() {
        let marks = plan_three_winding(&VectorGroup::parse("YNyn0"));

        assert_eq!(count(&marks, Ring::Top, Winding::Wye), 1);
        assert_eq!(count(&marks, Ring::Top, Winding::Neutral), 1);
        assert_eq!(count(&marks, Ring::BottomLeft, Winding::Wye), 1);
        assert_eq!(count(&marks, Ring::BottomLeft, Winding::Neutral), 1);
        assert!(marks.iter().all(|mark| mark.winding != Winding::Delta));
    }

    #[test]
    fn test_same_family_windings_alternate() {
        let marks = plan_three_winding(&VectorGroup::parse("YNd5d5"));

        assert_eq!(count(&marks, Ring::BottomLeft, Winding::Delta), 1);
        assert_eq!(count(&marks, Ring::BottomRight, Winding::Delta), 1);
    }

    #[test]
    fn test_neutral_follows_right_winding() {
        // d lands left, y lands right, and the neutral joins the wye
        let marks = plan_three_winding(&VectorGroup::parse("Ydyn"));

        assert_eq!(marks[1].ring, Ring::BottomLeft);
        assert_eq!(marks[2].ring, Ring::BottomRight);
        assert_eq!(
            marks[3],
            Mark {
                ring: Ring::BottomRight,
                winding: Winding::Neutral
            }
        );
    }

    #[test]
    fn test_cursor_state_machine() {
        let cursor = LowSideCursor::new();
        let (cursor, _) = cursor.place(Winding::Wye);
        assert_eq!(cursor.winding_side(), Side::Right);
        assert_eq!(cursor.neutral_side(), Side::Left);

        let (cursor, mark) = cursor.place(Winding::Delta);
        assert_eq!(mark.ring, Ring::BottomRight);
        assert_eq!(cursor.winding_side(), Side::Left);
        assert_eq!(cursor.neutral_side(), Side::Right);
    }

    #[test]
    fn test_draw_mark_segments() {
        let frame = Frame::at(Point::default());
        let mut backend = RecordingBackend::new();

        draw_mark(&mut backend, &frame, Mark { ring: Ring::Top, winding: Winding::Delta });
        draw_mark(&mut backend, &frame, Mark { ring: Ring::Bottom, winding: Winding::Wye });
        draw_mark(&mut backend, &frame, Mark { ring: Ring::Bottom, winding: Winding::Neutral });

        let lines: Vec<_> = backend.polylines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].1);
        assert_eq!(lines[0].0.len(), 3);
        assert!(lines[1].0[0].approx_eq(Point::new(0.0, -RING_OFFSET), 1e-6));
        assert!(lines[4].0[1].approx_eq(Point::new(GLYPH_HALF_WIDTH, -RING_OFFSET), 1e-6));
    }
}
