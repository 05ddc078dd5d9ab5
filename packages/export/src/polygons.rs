//! Grid cell boundaries as polygon layer records.

use geo::{Geometry, Polygon};
use geojson::GeoJson;
use locate_ncr_grid_models::{Coordinates, GridCell};
use serde::Serialize;
use serde_json::Value;

/// A grid cell ready to draw as a polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPolygon {
    /// Cell identifier.
    pub grid_id: i64,
    /// Outer ring as `[lng, lat]` points.
    pub polygon: Vec<[f64; 2]>,
    /// POIs of any category in the cell.
    pub poi_count: u32,
    /// POIs per square kilometer.
    pub poi_density: f64,
    /// Cell centroid, if known.
    pub centroid: Option<Coordinates>,
}

fn parse_boundary(boundary: &Value) -> Option<GeoJson> {
    match boundary {
        Value::String(text) => text.parse().ok(),
        other => GeoJson::from_json_value(other.clone()).ok(),
    }
}

/// Outer ring of a GeoJSON `Polygon`, or of the first polygon of a
/// `MultiPolygon`. The boundary may be a GeoJSON object or a string
/// holding one.
#[must_use]
pub fn outer_ring(boundary: &Value) -> Option<Vec<[f64; 2]>> {
    let GeoJson::Geometry(geometry) = parse_boundary(boundary)? else {
        return None;
    };
    let geometry: Geometry<f64> = geometry.try_into().ok()?;

    let polygon: Polygon<f64> = match geometry {
        Geometry::Polygon(p) => p,
        Geometry::MultiPolygon(mp) => mp.0.into_iter().next()?,
        _ => return None,
    };

    let ring: Vec<[f64; 2]> = polygon.exterior().coords().map(|c| [c.x, c.y]).collect();
    if ring.is_empty() { None } else { Some(ring) }
}

/// Polygon records for every cell with a drawable boundary.
///
/// Cells without a boundary are skipped silently; cells whose boundary is
/// not a usable polygon are skipped with a warning.
#[must_use]
pub fn polygon_layer_records(cells: &[GridCell]) -> Vec<GridPolygon> {
    cells
        .iter()
        .filter_map(|cell| {
            let boundary = cell.boundary.as_ref()?;
            let Some(polygon) = outer_ring(boundary) else {
                log::warn!("Skipping grid cell {} with unusable boundary", cell.id);
                return None;
            };

            Some(GridPolygon {
                grid_id: cell.id,
                polygon,
                poi_count: cell.poi_count,
                poi_density: cell.poi_density,
                centroid: cell.centroid,
            })
        })
        .collect()
}
