//! Geosieve - classify geographic points against a reference boundary
//!
//! Cleans coordinate text, triages records into zero / invalid / valid, and
//! tests valid points for containment in a (multi-)polygon boundary.

pub mod clean;
pub mod error;
pub mod models;
pub mod pip;
pub mod pipeline;
pub mod session;
pub mod source;

pub use error::{GeosieveError, Result};
pub use models::{Category, ContainmentStatus, Coordinate, Outcome, Record, RecordSet, ResultBundle};
pub use pipeline::Pipeline;
