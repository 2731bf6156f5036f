//! Coordinate reference handling for boundary geometry.
//!
//! Points are always WGS84 lon/lat degrees, so only the boundary is ever
//! reprojected.

use geo::{BoundingRect, Coord, MapCoords, Polygon};
use tracing::{info, warn};

use crate::clean::{LAT_RANGE, LON_RANGE};
use crate::error::{GeosieveError, Result};

/// WGS84 semi-major axis used by spherical Web Mercator
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// EPSG:4326 / OGC CRS84, lon/lat degrees
    Wgs84,
    /// EPSG:3857 spherical Web Mercator, meters
    WebMercator,
}

impl Crs {
    /// Resolve a CRS name such as `EPSG:4326`, `urn:ogc:def:crs:EPSG::3857`
    /// or `urn:ogc:def:crs:OGC:1.3:CRS84`
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Crs::Wgs84);
        }

        let code = upper
            .rsplit(':')
            .find(|segment| !segment.is_empty())
            .and_then(|segment| segment.parse::<u32>().ok());

        match code {
            Some(4326) => Ok(Crs::Wgs84),
            Some(3857) | Some(900913) | Some(3785) | Some(102100) | Some(102113) => {
                Ok(Crs::WebMercator)
            }
            _ => Err(GeosieveError::UnsupportedCrs {
                name: name.to_string(),
            }),
        }
    }
}

/// Express boundary parts in WGS84 lon/lat
pub fn to_wgs84(parts: Vec<Polygon<f64>>, crs: Crs) -> Vec<Polygon<f64>> {
    let parts = match crs {
        Crs::Wgs84 => parts,
        Crs::WebMercator => {
            info!("Reprojecting {} boundary parts from EPSG:3857", parts.len());
            parts
                .iter()
                .map(|p| p.map_coords(mercator_to_lonlat))
                .collect()
        }
    };

    warn_if_out_of_range(&parts);
    parts
}

fn mercator_to_lonlat(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

/// True when any part reaches past the valid lon/lat ranges
fn out_of_range(parts: &[Polygon<f64>]) -> bool {
    parts.iter().filter_map(|p| p.bounding_rect()).any(|rect| {
        rect.min().x < LON_RANGE.0
            || rect.max().x > LON_RANGE.1
            || rect.min().y < LAT_RANGE.0
            || rect.max().y > LAT_RANGE.1
    })
}

fn warn_if_out_of_range(parts: &[Polygon<f64>]) {
    if out_of_range(parts) {
        warn!(
            "Boundary extends beyond lon/lat range; it may be in a projected CRS without a crs declaration"
        );
    }
}
