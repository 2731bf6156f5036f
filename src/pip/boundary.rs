//! Boundary preparation: reprojection, union, and indexing.

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon};
use tracing::info;

use super::crs::to_wgs84;
use super::{BoundaryGeometry, PreparedBoundary};
use crate::error::{GeosieveError, Result};

/// Merge all parts of a boundary into one WGS84 union ready for containment tests.
///
/// Overlapping or adjacent parts are merged, self-intersecting rings are split
/// into simple ones, and holes are kept. A boundary with no polygon area left
/// after the union is an error.
pub fn prepare(geometry: &BoundaryGeometry) -> Result<PreparedBoundary> {
    if geometry.is_empty() {
        return Err(GeosieveError::EmptyBoundary);
    }

    info!("Preparing boundary from {} parts...", geometry.parts.len());

    let parts = to_wgs84(geometry.parts.clone(), geometry.crs);

    // Every part goes through the overlay, so a lone self-intersecting ring is
    // normalized too
    let union = parts
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, part| acc.union(part));

    if union.0.is_empty() || union.unsigned_area() == 0.0 {
        return Err(GeosieveError::EmptyBoundary);
    }

    if let Some(rect) = union.bounding_rect() {
        info!(
            "Boundary union has {} parts, envelope ({}, {}) - ({}, {})",
            union.0.len(),
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y
        );
    }

    Ok(PreparedBoundary::build(union))
}
