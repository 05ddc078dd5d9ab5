#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Catchment analysis around a candidate site.
//!
//! A catchment is the circle of a given radius around a site. This crate
//! summarizes what falls inside it ([`catchment_metrics`]), which
//! same-category competitors share it ([`competitor_overlap`]), and builds
//! translucent rings for drawing catchments around recommended cells
//! ([`catchment_layers`]).

pub mod layers;
pub mod metrics;
pub mod overlap;

use std::collections::BTreeMap;

use locate_ncr_grid_models::Coordinates;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use layers::{DEFAULT_CATCHMENT_RADII_KM, catchment_layers};
pub use metrics::catchment_metrics;
pub use overlap::competitor_overlap;

/// Summary of everything inside a catchment circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchmentMetrics {
    /// Catchment radius in kilometers.
    pub radius_km: f64,
    /// Circle area in square kilometers, rounded to 2 decimals.
    pub area_sq_km: f64,
    /// POIs of any category inside the circle.
    pub poi_count_in_radius: usize,
    /// POIs inside the circle per category name.
    pub category_breakdown: BTreeMap<String, usize>,
    /// Grid cells whose centroid is inside the circle.
    pub grid_cells_covered: usize,
    /// Mean POI density of the covered cells, rounded to 1 decimal.
    pub avg_density: f64,
    /// Rough resident estimate.
    pub estimated_population: u64,
}

/// How crowded a catchment is with competitors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CompetitionLevel {
    /// Two or fewer competitors.
    Low,
    /// Three to five competitors.
    Medium,
    /// More than five competitors.
    High,
}

impl CompetitionLevel {
    /// Level for a number of in-radius competitors.
    #[must_use]
    pub const fn from_count(count: usize) -> Self {
        if count > 5 {
            Self::High
        } else if count > 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A competitor inside the catchment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEntry {
    /// POI identifier.
    pub id: i64,
    /// Display name (`Unnamed` when the POI has none).
    pub name: String,
    /// Distance from the catchment center, rounded to 2 decimals.
    pub distance_km: f64,
    /// Competitor location.
    pub coordinates: Coordinates,
}

/// The closest competitor, wherever it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestCompetitor {
    /// POI identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Distance from the catchment center, rounded to 2 decimals.
    pub distance_km: f64,
}

/// Competitors sharing a catchment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorOverlap {
    /// Total competitors inside the radius.
    pub competitors_in_radius: usize,
    /// Up to the ten closest in-radius competitors, nearest first.
    pub competitors: Vec<CompetitorEntry>,
    /// Closest competitor, inside the radius or not.
    pub nearest: Option<NearestCompetitor>,
    /// Crowding level from `competitors_in_radius`.
    pub level: CompetitionLevel,
}

/// A catchment ring ready to draw as a polygon layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchmentRing {
    /// Grid cell the ring is centered on.
    pub grid_id: i64,
    /// Ring radius in kilometers.
    pub radius_km: f64,
    /// Closed ring of `[lng, lat]` points.
    pub polygon: Vec<[f64; 2]>,
    /// RGBA fill.
    pub fill_color: [u8; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_level_bands() {
        assert_eq!(CompetitionLevel::from_count(0), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_count(2), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_count(3), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_count(5), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_count(6), CompetitionLevel::High);
    }
}
