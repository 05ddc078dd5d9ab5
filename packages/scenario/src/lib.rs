#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! What-if analysis of a single candidate location.
//!
//! Given any coordinate, [`analyze_location`] finds the grid cell it
//! belongs to, counts same-category competitors and overall POI activity
//! nearby, and turns those counts into an opportunity score with a
//! verdict:
//!
//! ```text
//! activity    = min(100, pois_within_1km * 2)
//! competition = min(100, competitors_within_1km * 20)
//! opportunity = clamp(activity - competition + 50, 0, 100)
//! ```

use std::f64::consts::PI;

use locate_ncr_grid_models::{Coordinates, GridCell, PoiRecord};
use locate_ncr_scoring_models::round_to;
use locate_ncr_spatial::{PoiIndex, haversine_km, nearest_cell};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Radius of the reported catchment, in kilometers.
pub const SCENARIO_CATCHMENT_KM: f64 = 1.0;
/// Inner activity radius, in kilometers.
pub const NEAR_ACTIVITY_KM: f64 = 0.5;
/// Outer competitor radius, in kilometers.
pub const WIDE_COMPETITOR_KM: f64 = 2.0;

const ACTIVITY_POINTS_PER_POI: u32 = 2;
const PENALTY_PER_COMPETITOR: u32 = 20;
const NEUTRAL_OPPORTUNITY: i64 = 50;
const PEOPLE_PER_SQ_KM: f64 = 5000.0;
/// POIs within 1 km that count as average density.
const AVERAGE_ACTIVITY_POIS: f64 = 50.0;

/// Overall call on a location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Verdict {
    /// Opportunity score of 70 or more.
    Excellent,
    /// 50 to 69.
    Good,
    /// 30 to 49.
    Moderate,
    /// Below 30.
    Poor,
}

impl Verdict {
    /// Verdict for an opportunity score.
    #[must_use]
    pub const fn from_opportunity(score: u32) -> Self {
        match score {
            70.. => Self::Excellent,
            50..=69 => Self::Good,
            30..=49 => Self::Moderate,
            _ => Self::Poor,
        }
    }

    /// One-line explanation shown with the verdict.
    #[must_use]
    pub const fn detail(self) -> &'static str {
        match self {
            Self::Excellent => "High activity, low competition - Recommended!",
            Self::Good => "Reasonable opportunity with moderate competition",
            Self::Moderate => "Some potential, but watch competition",
            Self::Poor => "High competition or low activity area",
        }
    }

    /// Hex display color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#00f5d4",
            Self::Good => "#ffc107",
            Self::Moderate => "#ff9800",
            Self::Poor => "#ef476f",
        }
    }
}

/// How busy the surroundings are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ActivityLevel {
    /// Up to 15 POIs within 1 km.
    Low,
    /// 16 to 30 POIs within 1 km.
    Medium,
    /// More than 30 POIs within 1 km.
    High,
}

impl ActivityLevel {
    /// Level for the number of POIs within 1 km.
    #[must_use]
    pub const fn from_count(pois_1km: usize) -> Self {
        if pois_1km > 30 {
            Self::High
        } else if pois_1km > 15 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// The grid cell a location falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridReference {
    /// Identifier of the nearest cell.
    pub grid_id: i64,
    /// Cell POI density, rounded to 1 decimal.
    pub poi_density: f64,
    /// POIs of any category in the cell.
    pub poi_count: u32,
    /// Distance from the location to the cell centroid in kilometers.
    pub distance_km: f64,
}

/// Closest existing competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestCompetitor {
    /// POI identifier.
    pub id: i64,
    /// Display name (`Unnamed` when the POI has none).
    pub name: String,
    /// Whole meters, truncated.
    pub distance_m: u64,
}

/// Same-category competition around the location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSummary {
    /// Competitors within 1 km.
    pub within_1km: usize,
    /// Competitors within 2 km, including those within 1 km.
    pub within_2km: usize,
    /// Closest competitor at any distance.
    pub nearest: Option<NearestCompetitor>,
}

/// Overall POI activity around the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    /// POIs of any category within 500 m.
    pub pois_500m: usize,
    /// POIs of any category within 1 km.
    pub pois_1km: usize,
    /// Busyness band from `pois_1km`.
    pub level: ActivityLevel,
}

/// Score components, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioScores {
    /// Two points per POI within 1 km.
    pub activity_score: u32,
    /// Twenty points per competitor within 1 km.
    pub competition_penalty: u32,
    /// `activity_score - competition_penalty + 50`, clamped.
    pub opportunity_score: u32,
}

/// Full analysis of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// The analyzed point.
    pub location: Coordinates,
    /// Cell the location falls in.
    pub grid: GridReference,
    /// Same-category competitors nearby.
    pub competition: CompetitionSummary,
    /// Overall activity nearby.
    pub activity: ActivitySummary,
    /// Radius the population estimate covers.
    pub catchment_radius_km: f64,
    /// Residents within the catchment radius.
    pub estimated_population: u64,
    /// Score components.
    pub scores: ScenarioScores,
    /// Overall call from `opportunity_score`.
    pub verdict: Verdict,
}

/// Outcome of [`analyze_location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ScenarioOutcome {
    /// The location was analyzed.
    Analyzed(Box<ScenarioResult>),
    /// No grid cell has a centroid, so the location cannot be placed.
    NoGridCell,
}

impl ScenarioOutcome {
    /// The analysis, if there is one.
    #[must_use]
    pub fn result(&self) -> Option<&ScenarioResult> {
        match self {
            Self::Analyzed(result) => Some(result),
            Self::NoGridCell => None,
        }
    }
}

/// Scores a location from its activity and competitor counts.
#[must_use]
pub fn scenario_scores(pois_1km: usize, competitors_1km: usize) -> ScenarioScores {
    let pois = u32::try_from(pois_1km).unwrap_or(u32::MAX);
    let competitors = u32::try_from(competitors_1km).unwrap_or(u32::MAX);

    let activity_score = pois.saturating_mul(ACTIVITY_POINTS_PER_POI).min(100);
    let competition_penalty = competitors.saturating_mul(PENALTY_PER_COMPETITOR).min(100);
    let opportunity = (i64::from(activity_score) - i64::from(competition_penalty)
        + NEUTRAL_OPPORTUNITY)
        .clamp(0, 100);

    ScenarioScores {
        activity_score,
        competition_penalty,
        opportunity_score: u32::try_from(opportunity).unwrap_or(0),
    }
}

/// Residents within the 1 km catchment, scaled by how busy it is.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scenario_population(pois_1km: usize) -> u64 {
    let density_factor = if pois_1km > 0 {
        pois_1km as f64 / AVERAGE_ACTIVITY_POIS
    } else {
        0.5
    };
    let area = PI * SCENARIO_CATCHMENT_KM * SCENARIO_CATCHMENT_KM;
    (area * PEOPLE_PER_SQ_KM * density_factor).floor() as u64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nearest_competitor(point: Coordinates, competitors: &[PoiRecord]) -> Option<NearestCompetitor> {
    let mut best: Option<(&PoiRecord, f64)> = None;

    for poi in competitors {
        let Some(c) = poi.coordinates else {
            continue;
        };
        let distance = haversine_km(point, c);
        if distance.is_finite() && best.is_none_or(|(_, d)| distance < d) {
            best = Some((poi, distance));
        }
    }

    best.map(|(poi, distance)| NearestCompetitor {
        id: poi.id,
        name: poi.display_name().to_string(),
        distance_m: (distance * 1000.0) as u64,
    })
}

/// Evaluates opening a new site at `point`.
///
/// `competitors` are existing POIs of the category being sited;
/// `all_pois` are POIs of every category and measure activity. Returns
/// [`ScenarioOutcome::NoGridCell`] when no cell has a centroid.
#[must_use]
pub fn analyze_location(
    point: Coordinates,
    cells: &[GridCell],
    competitors: &[PoiRecord],
    all_pois: &[PoiRecord],
) -> ScenarioOutcome {
    let Some((cell, cell_distance)) = nearest_cell(cells, point) else {
        log::warn!("No grid cell with a centroid to place ({}, {})", point.lat, point.lng);
        return ScenarioOutcome::NoGridCell;
    };

    let competitor_index = PoiIndex::new(competitors);
    let competitors_2km = competitor_index.within(point, WIDE_COMPETITOR_KM);
    let within_1km = competitors_2km
        .iter()
        .filter(|hit| hit.distance_km <= SCENARIO_CATCHMENT_KM)
        .count();

    let activity_index = PoiIndex::new(all_pois);
    let pois_1km = activity_index.within(point, SCENARIO_CATCHMENT_KM);
    let pois_500m = pois_1km
        .iter()
        .filter(|hit| hit.distance_km <= NEAR_ACTIVITY_KM)
        .count();

    let scores = scenario_scores(pois_1km.len(), within_1km);
    let verdict = Verdict::from_opportunity(scores.opportunity_score);

    log::debug!(
        "Scenario at ({}, {}): cell {}, {within_1km} competitors, {} POIs within 1 km, {verdict}",
        point.lat,
        point.lng,
        cell.id,
        pois_1km.len()
    );

    ScenarioOutcome::Analyzed(Box::new(ScenarioResult {
        location: point,
        grid: GridReference {
            grid_id: cell.id,
            poi_density: round_to(cell.poi_density, 1),
            poi_count: cell.poi_count,
            distance_km: cell_distance,
        },
        competition: CompetitionSummary {
            within_1km,
            within_2km: competitors_2km.len(),
            nearest: nearest_competitor(point, competitors),
        },
        activity: ActivitySummary {
            pois_500m,
            pois_1km: pois_1km.len(),
            level: ActivityLevel::from_count(pois_1km.len()),
        },
        catchment_radius_km: SCENARIO_CATCHMENT_KM,
        estimated_population: scenario_population(pois_1km.len()),
        scores,
        verdict,
    }))
}
