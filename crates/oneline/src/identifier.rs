//! Typed element identifiers.
//!
//! Every element of a network is addressed by the integer row index of its
//! table, unique within its category. The newtypes here keep indices of
//! different categories apart at compile time; the diagram validates that a
//! referenced element exists when the referencing symbol is added.

use std::fmt;

/// Element category, one per network table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Bus,
    Line,
    Switch,
    Trafo,
    Trafo3w,
    Impedance,
    Gen,
    ExtGrid,
    Shunt,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Line => "line",
            Self::Switch => "switch",
            Self::Trafo => "trafo",
            Self::Trafo3w => "trafo3w",
            Self::Impedance => "impedance",
            Self::Gen => "gen",
            Self::ExtGrid => "ext_grid",
            Self::Shunt => "shunt",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident => $category:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub const CATEGORY: Category = $category;

            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Row index in the network table
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", Self::CATEGORY, self.0)
            }
        }
    };
}

element_id!(
    /// Index of a bus
    BusId => Category::Bus
);
element_id!(
    /// Index of a line
    LineId => Category::Line
);
element_id!(SwitchId => Category::Switch);
element_id!(
    /// Index of a two-winding transformer
    TrafoId => Category::Trafo
);
element_id!(
    /// Index of a three-winding transformer
    Trafo3wId => Category::Trafo3w
);
element_id!(ImpedanceId => Category::Impedance);
element_id!(GenId => Category::Gen);
element_id!(ExtGridId => Category::ExtGrid);
element_id!(ShuntId => Category::Shunt);

/// The element a switch interposes between itself and its bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Bus(BusId),
    Line(LineId),
    Trafo(TrafoId),
    Trafo3w(Trafo3wId),
}

impl ElementKey {
    /// Resolves a switch element from its table code and index.
    ///
    /// Codes are `b` (bus), `l` (line), `t` (two-winding transformer) and
    /// `t3` (three-winding transformer).
    pub fn from_code(code: &str, index: usize) -> Option<Self> {
        match code {
            "b" => Some(Self::Bus(BusId(index))),
            "l" => Some(Self::Line(LineId(index))),
            "t" => Some(Self::Trafo(TrafoId(index))),
            "t3" => Some(Self::Trafo3w(Trafo3wId(index))),
            _ => None,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Bus(_) => Category::Bus,
            Self::Line(_) => Category::Line,
            Self::Trafo(_) => Category::Trafo,
            Self::Trafo3w(_) => Category::Trafo3w,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Bus(id) => id.index(),
            Self::Line(id) => id.index(),
            Self::Trafo(id) => id.index(),
            Self::Trafo3w(id) => id.index(),
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category(), self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BusId::new(4).to_string(), "bus 4");
        assert_eq!(ElementKey::Trafo3w(Trafo3wId::new(1)).to_string(), "trafo3w 1");
    }

    #[test]
    fn test_element_codes() {
        assert_eq!(ElementKey::from_code("l", 2), Some(ElementKey::Line(LineId::new(2))));
        assert_eq!(ElementKey::from_code("t3", 0), Some(ElementKey::Trafo3w(Trafo3wId::new(0))));
        assert_eq!(ElementKey::from_code("x", 0), None);
    }
}
