//! Parsed coordinates and the labels assigned to them.

use serde::{Deserialize, Serialize};

/// A longitude/latitude pair, or the marker for text that did not parse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Parsed { x: f64, y: f64 },
    Unparsed,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate::Parsed { x, y }
    }

    pub fn xy(&self) -> Option<(f64, f64)> {
        match *self {
            Coordinate::Parsed { x, y } => Some((x, y)),
            Coordinate::Unparsed => None,
        }
    }
}

/// Validity category. Every record gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Exactly (0, 0): the usual "no fix acquired" sentinel
    Zero,
    /// Unparsable or outside lon/lat range
    Invalid,
    Valid,
}

/// Position of a valid point relative to the reference boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainmentStatus {
    Inside,
    Outside,
}

impl ContainmentStatus {
    pub fn from_contained(contained: bool) -> Self {
        if contained {
            ContainmentStatus::Inside
        } else {
            ContainmentStatus::Outside
        }
    }
}

impl std::fmt::Display for ContainmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainmentStatus::Inside => write!(f, "Inside"),
            ContainmentStatus::Outside => write!(f, "Outside"),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Zero => write!(f, "zero"),
            Category::Invalid => write!(f, "invalid"),
            Category::Valid => write!(f, "valid"),
        }
    }
}
