//! Coordinate cleaning: text parsing and validity classification.

mod classifier;
mod parser;

pub use classifier::{classify, classify_all, LAT_RANGE, LON_RANGE};
pub use parser::{parse, parse_value};
