#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grid cell, POI record, and coordinate types.
//!
//! These are the read-only inputs to every recommendation analysis. Grid
//! cells and POIs arrive from the spatial data store as flat records
//! (`grid_id`, `centroid_lat`, `osm_id`, ...); the wire shapes are
//! translated here so that missing or non-numeric coordinates become
//! `None` instead of failing the whole request.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, returning `None` if either component is
    /// NaN or infinite.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if lat.is_finite() && lng.is_finite() {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Returns the pair in `[lng, lat]` order, as used by `GeoJSON` rings.
    #[must_use]
    pub const fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Builds [`Coordinates`] from loosely-typed JSON values.
///
/// Accepts numbers and numeric strings. Anything else (null, booleans,
/// unparseable strings, NaN) yields `None`, as does a zero latitude or
/// longitude, which the store writes for unknown positions.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn coordinates_from_values(
    lat: Option<&serde_json::Value>,
    lng: Option<&serde_json::Value>,
) -> Option<Coordinates> {
    let lat = lenient_f64(lat?)?;
    let lng = lenient_f64(lng?)?;
    if lat == 0.0 || lng == 0.0 {
        return None;
    }
    Coordinates::new(lat, lng)
}

fn lenient_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Category of a point of interest.
///
/// Categories that appear in the weight tables have dedicated variants;
/// anything else from the data store is folded into [`PoiCategory::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PoiCategory {
    /// Cash machines
    Atm,
    /// Hospitals
    Hospital,
    /// Clinics (scored like hospitals for quiet-area preference)
    Clinic,
    /// Shopping malls
    Mall,
    /// Pharmacies and chemists
    Pharmacy,
    /// Schools, colleges, universities
    School,
    /// Bank branches
    Bank,
    /// Police stations
    Police,
    /// Bus stations
    BusStation,
    /// Fuel stations
    Fuel,
    /// Supermarkets
    Supermarket,
    /// Anything not covered above
    Other,
}

impl PoiCategory {
    /// Every category, in declaration order.
    pub const ALL: &[Self] = &[
        Self::Atm,
        Self::Hospital,
        Self::Clinic,
        Self::Mall,
        Self::Pharmacy,
        Self::School,
        Self::Bank,
        Self::Police,
        Self::BusStation,
        Self::Fuel,
        Self::Supermarket,
        Self::Other,
    ];

    /// Parses a category name, mapping unknown names to [`Self::Other`].
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or(Self::Other)
    }

    /// Whether this category is better sited away from busy commercial
    /// areas. Used to invert the commercial factor in advanced scoring.
    #[must_use]
    pub const fn prefers_quiet(self) -> bool {
        matches!(self, Self::School | Self::Hospital | Self::Clinic)
    }

    /// Human-readable facility name used in recommendation reasons.
    #[must_use]
    pub const fn facility_name(self) -> &'static str {
        match self {
            Self::Atm => "ATM",
            Self::Hospital => "Healthcare Facility",
            Self::Mall => "Shopping Mall",
            _ => "POI",
        }
    }
}

impl From<String> for PoiCategory {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

/// A uniform spatial grid cell carrying aggregate POI statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridCellRecord", into = "GridCellRecord")]
pub struct GridCell {
    /// Stable grid identifier.
    pub id: i64,
    /// Number of POIs (all categories) inside the cell.
    pub poi_count: u32,
    /// Cell area in square kilometers.
    pub area_sq_km: f64,
    /// POIs per square kilometer.
    pub poi_density: f64,
    /// Average density of the surrounding cells, precomputed by the store.
    pub neighbor_poi_density: f64,
    /// Cell centroid, `None` when the store had no usable coordinates.
    pub centroid: Option<Coordinates>,
    /// Raw `GeoJSON` boundary, passed through for rendering.
    pub boundary: Option<serde_json::Value>,
}

impl GridCell {
    /// Creates a cell with density derived from `poi_count / area_sq_km`
    /// (zero for a non-positive area).
    #[must_use]
    pub fn new(id: i64, poi_count: u32, area_sq_km: f64) -> Self {
        Self {
            id,
            poi_count,
            area_sq_km,
            poi_density: density(poi_count, area_sq_km),
            neighbor_poi_density: 0.0,
            centroid: None,
            boundary: None,
        }
    }

    /// Sets the centroid.
    #[must_use]
    pub const fn with_centroid(mut self, centroid: Coordinates) -> Self {
        self.centroid = Some(centroid);
        self
    }

    /// Overrides the POI density.
    #[must_use]
    pub const fn with_poi_density(mut self, poi_density: f64) -> Self {
        self.poi_density = poi_density;
        self
    }

    /// Sets the neighbor POI density.
    #[must_use]
    pub const fn with_neighbor_density(mut self, neighbor_poi_density: f64) -> Self {
        self.neighbor_poi_density = neighbor_poi_density;
        self
    }

    /// Sets the `GeoJSON` boundary.
    #[must_use]
    pub fn with_boundary(mut self, boundary: serde_json::Value) -> Self {
        self.boundary = Some(boundary);
        self
    }
}

fn density(poi_count: u32, area_sq_km: f64) -> f64 {
    if area_sq_km > 0.0 {
        f64::from(poi_count) / area_sq_km
    } else {
        0.0
    }
}

/// Flat grid cell row as produced by the spatial data store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridCellRecord {
    grid_id: i64,
    #[serde(default)]
    poi_count: u32,
    #[serde(default)]
    area_sq_km: f64,
    #[serde(default)]
    poi_density: Option<f64>,
    #[serde(default)]
    neighbor_poi_density: Option<f64>,
    #[serde(default)]
    centroid_lat: Option<serde_json::Value>,
    #[serde(default)]
    centroid_lng: Option<serde_json::Value>,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
}

impl From<GridCellRecord> for GridCell {
    fn from(r: GridCellRecord) -> Self {
        Self {
            id: r.grid_id,
            poi_count: r.poi_count,
            area_sq_km: r.area_sq_km,
            poi_density: r
                .poi_density
                .unwrap_or_else(|| density(r.poi_count, r.area_sq_km)),
            neighbor_poi_density: r.neighbor_poi_density.unwrap_or(0.0),
            centroid: coordinates_from_values(r.centroid_lat.as_ref(), r.centroid_lng.as_ref()),
            boundary: r.geometry,
        }
    }
}

impl From<GridCell> for GridCellRecord {
    fn from(c: GridCell) -> Self {
        Self {
            grid_id: c.id,
            poi_count: c.poi_count,
            area_sq_km: c.area_sq_km,
            poi_density: Some(c.poi_density),
            neighbor_poi_density: Some(c.neighbor_poi_density),
            centroid_lat: c.centroid.map(|p| p.lat.into()),
            centroid_lng: c.centroid.map(|p| p.lng.into()),
            geometry: c.boundary,
        }
    }
}

/// An existing point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoiWireRecord", into = "PoiWireRecord")]
pub struct PoiRecord {
    /// `OpenStreetMap` identifier.
    pub id: i64,
    /// Display name, if tagged.
    pub name: Option<String>,
    /// Category of the POI.
    pub category: PoiCategory,
    /// Location, `None` when missing or invalid.
    pub coordinates: Option<Coordinates>,
}

impl PoiRecord {
    /// Creates an unnamed POI.
    #[must_use]
    pub const fn new(id: i64, category: PoiCategory, coordinates: Option<Coordinates>) -> Self {
        Self {
            id,
            name: None,
            category,
            coordinates,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the name, or `"Unnamed"` if none was tagged.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }
}

/// Flat POI row as produced by the spatial data store.
///
/// The category may arrive under several column names depending on the
/// query that produced the row; the first present one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PoiWireRecord {
    osm_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, skip_serializing)]
    poi_type: Option<String>,
    #[serde(default, skip_serializing)]
    amenity: Option<String>,
    #[serde(default, skip_serializing)]
    shop: Option<String>,
    #[serde(default)]
    lat: Option<serde_json::Value>,
    #[serde(default)]
    lng: Option<serde_json::Value>,
}

impl From<PoiWireRecord> for PoiRecord {
    fn from(r: PoiWireRecord) -> Self {
        let category = r
            .category
            .or(r.poi_type)
            .or(r.amenity)
            .or(r.shop)
            .map_or(PoiCategory::Other, |c| PoiCategory::parse_lenient(&c));

        Self {
            id: r.osm_id,
            name: r.name.filter(|n| !n.is_empty()),
            category,
            coordinates: coordinates_from_values(r.lat.as_ref(), r.lng.as_ref()),
        }
    }
}

impl From<PoiRecord> for PoiWireRecord {
    fn from(p: PoiRecord) -> Self {
        Self {
            osm_id: p.id,
            name: p.name,
            category: Some(p.category.as_ref().to_string()),
            poi_type: None,
            amenity: None,
            shop: None,
            lat: p.coordinates.map(|c| c.lat.into()),
            lng: p.coordinates.map(|c| c.lng.into()),
        }
    }
}
