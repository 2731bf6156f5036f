//! Boundary decoding from GeoJSON text.

use geo::{Coord, LineString, Polygon};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::crs::Crs;
use crate::error::{GeosieveError, Result};

/// Polygon parts of a boundary file, still in their source coordinate system
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGeometry {
    pub parts: Vec<Polygon<f64>>,
    pub crs: Crs,
}

impl BoundaryGeometry {
    pub fn new(parts: Vec<Polygon<f64>>, crs: Crs) -> Self {
        Self { parts, crs }
    }

    /// Parts already expressed in WGS84 lon/lat
    pub fn wgs84(parts: Vec<Polygon<f64>>) -> Self {
        Self::new(parts, Crs::Wgs84)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

type Position = Vec<f64>;

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    geometry: Option<GeometryDoc>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryDoc {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeometryDoc>,
    },
    /// Points and lines carry no area
    #[serde(other)]
    NonAreal,
}

#[derive(Deserialize)]
struct CrsDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
}

/// Decode a GeoJSON document (FeatureCollection, Feature, or bare geometry)
pub fn decode(text: &str) -> Result<BoundaryGeometry> {
    let root: Value = serde_json::from_str(text)?;
    let crs = match root.get("crs") {
        Some(Value::Null) | None => Crs::Wgs84,
        Some(crs) => parse_crs(crs)?,
    };

    let kind = root
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeosieveError::malformed("missing GeoJSON \"type\" member"))?
        .to_string();

    let mut parts = Vec::new();
    match kind.as_str() {
        "FeatureCollection" => {
            let doc: FeatureCollectionDoc = serde_json::from_value(root)?;
            for (idx, feature) in doc.features.into_iter().enumerate() {
                match feature.geometry {
                    Some(geometry) => collect_polygons(geometry, &mut parts)?,
                    None => debug!("Feature {} has no geometry, skipping", idx),
                }
            }
        }
        "Feature" => {
            let doc: FeatureDoc = serde_json::from_value(root)?;
            if let Some(geometry) = doc.geometry {
                collect_polygons(geometry, &mut parts)?;
            }
        }
        _ => {
            let geometry: GeometryDoc = serde_json::from_value(root)?;
            collect_polygons(geometry, &mut parts)?;
        }
    }

    debug!("Decoded {} polygon parts from {}", parts.len(), kind);

    if parts.is_empty() {
        return Err(GeosieveError::EmptyBoundary);
    }

    Ok(BoundaryGeometry::new(parts, crs))
}

fn parse_crs(value: &Value) -> Result<Crs> {
    let doc: CrsDoc = serde_json::from_value(value.clone())
        .map_err(|e| GeosieveError::malformed(format!("invalid crs member: {}", e)))?;

    let name = match doc.kind.as_str() {
        "name" => doc
            .properties
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        // GeoJSON 2008 form: {"type": "EPSG", "properties": {"code": 4326}}
        "EPSG" => doc
            .properties
            .get("code")
            .map(|code| match code {
                Value::String(s) => format!("EPSG:{}", s),
                other => format!("EPSG:{}", other),
            }),
        _ => None,
    };

    match name {
        Some(name) => Crs::from_name(&name),
        None => Err(GeosieveError::UnsupportedCrs {
            name: format!("crs of type '{}'", doc.kind),
        }),
    }
}

fn collect_polygons(geometry: GeometryDoc, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    match geometry {
        GeometryDoc::Polygon { coordinates } => out.push(build_polygon(coordinates)?),
        GeometryDoc::MultiPolygon { coordinates } => {
            for rings in coordinates {
                out.push(build_polygon(rings)?);
            }
        }
        GeometryDoc::GeometryCollection { geometries } => {
            for g in geometries {
                collect_polygons(g, out)?;
            }
        }
        GeometryDoc::NonAreal => debug!("Skipping non-areal geometry"),
    }
    Ok(())
}

fn build_polygon(rings: Vec<Vec<Position>>) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| GeosieveError::malformed("polygon without rings"))?;
    let exterior = build_ring(exterior)?;
    let interiors = rings.map(build_ring).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn build_ring(positions: Vec<Position>) -> Result<LineString<f64>> {
    let mut ring = positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(GeosieveError::malformed(
                "position with fewer than two ordinates",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    // Close the ring if needed
    if ring.len() >= 3 && ring.first() != ring.last() {
        ring.push(ring[0]);
    }

    if ring.len() < 4 {
        return Err(GeosieveError::malformed(format!(
            "ring with {} positions, need at least 3 distinct",
            positions.len()
        )));
    }

    Ok(LineString::new(ring))
}
