//! Core data models for point classification.

pub mod coordinate;
pub mod record;
pub mod result;

pub use coordinate::{Category, ContainmentStatus, Coordinate};
pub use record::{Header, Record, RecordSet};
pub use result::{Outcome, ResultBundle, Summary, ValidRecord};
