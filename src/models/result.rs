//! Classification output handed to rendering and export layers.

use serde::{Deserialize, Serialize};

use super::{ContainmentStatus, Record};

/// A record in the valid partition, with its parsed position and containment
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    pub record: Record,
    pub x: f64,
    pub y: f64,
    pub status: ContainmentStatus,
}

/// Partitioned records plus the original row count.
///
/// Each partition keeps the relative input order of its records.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBundle {
    pub valid: Vec<ValidRecord>,
    pub zero: Vec<Record>,
    pub invalid: Vec<Record>,
    pub total: usize,
}

impl ResultBundle {
    /// Valid records inside the boundary
    pub fn inside(&self) -> impl Iterator<Item = &ValidRecord> {
        self.valid
            .iter()
            .filter(|v| v.status == ContainmentStatus::Inside)
    }

    /// Valid records outside the boundary
    pub fn outside(&self) -> impl Iterator<Item = &ValidRecord> {
        self.valid
            .iter()
            .filter(|v| v.status == ContainmentStatus::Outside)
    }

    pub fn summary(&self) -> Summary {
        let inside = self.inside().count();
        Summary {
            total: self.total,
            valid: self.valid.len(),
            zero: self.zero.len(),
            invalid: self.invalid.len(),
            inside,
            outside: self.valid.len() - inside,
        }
    }

    /// Mean position of the valid points (map center for renderers)
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.valid.is_empty() {
            return None;
        }
        let n = self.valid.len() as f64;
        let (sum_x, sum_y) = self
            .valid
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
        Some((sum_x / n, sum_y / n))
    }
}

/// Aggregate partition counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub zero: usize,
    pub invalid: usize,
    pub inside: usize,
    pub outside: usize,
}

/// Terminal result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Classified(ResultBundle),
    /// Every record was Zero or Invalid; containment was never tested.
    ///
    /// Both partitions are kept, in input order, so they can still be
    /// previewed and exported.
    NoUsableData {
        total: usize,
        zero: Vec<Record>,
        invalid: Vec<Record>,
    },
}

impl Outcome {
    pub fn bundle(&self) -> Option<&ResultBundle> {
        match self {
            Outcome::Classified(bundle) => Some(bundle),
            Outcome::NoUsableData { .. } => None,
        }
    }

    /// Records whose coordinates are exactly (0, 0)
    pub fn zero(&self) -> &[Record] {
        match self {
            Outcome::Classified(bundle) => &bundle.zero,
            Outcome::NoUsableData { zero, .. } => zero,
        }
    }

    /// Records that failed parsing or range checks
    pub fn invalid(&self) -> &[Record] {
        match self {
            Outcome::Classified(bundle) => &bundle.invalid,
            Outcome::NoUsableData { invalid, .. } => invalid,
        }
    }

    pub fn summary(&self) -> Summary {
        match self {
            Outcome::Classified(bundle) => bundle.summary(),
            Outcome::NoUsableData {
                total,
                zero,
                invalid,
            } => Summary {
                total: *total,
                zero: zero.len(),
                invalid: invalid.len(),
                ..Summary::default()
            },
        }
    }
}
