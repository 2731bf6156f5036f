//! Point-in-Polygon (PIP) containment engine.
//!
//! Decodes a reference boundary, merges its parts into one union, and answers
//! Inside/Outside for points using an R-tree spatial index.

mod boundary;
mod crs;
mod geojson;
mod index;

pub use boundary::prepare;
pub use crs::Crs;
pub use geojson::{decode, BoundaryGeometry};
pub use index::PreparedBoundary;

use std::path::Path;

use crate::error::Result;

/// Read and decode a GeoJSON boundary file
pub fn load_boundary<P: AsRef<Path>>(path: P) -> Result<BoundaryGeometry> {
    let text = std::fs::read_to_string(path)?;
    decode(&text)
}
