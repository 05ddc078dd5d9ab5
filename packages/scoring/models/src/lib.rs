#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the recommendation scoring engine.
//!
//! Every type here is a plain snapshot consumed verbatim by the
//! presentation layer: scored cells, growth classifications, and the
//! human-readable explanations attached to them.

use std::collections::BTreeMap;

use locate_ncr_grid_models::{Coordinates, PoiCategory};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Rounds to `decimals` places, resolving exact ties to the even digit.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Which scoring formula produced a result set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScoringMode {
    /// Density times demand weight minus a flat competitor penalty.
    Basic,
    /// Weighted multi-factor score on a 0-100 scale.
    Advanced,
}

/// Per-factor scores from advanced mode, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    /// Cell density relative to the densest cell.
    pub poi_density_score: f64,
    /// Commercial activity proxy (inverted for quiet-preferring categories).
    pub commercial_score: f64,
    /// Residential suitability, peaking at moderate density.
    pub residential_score: f64,
    /// Penalty for nearby same-category competitors.
    pub competitor_penalty: f64,
    /// Log-scaled access to surrounding activity.
    pub accessibility_score: f64,
}

impl FactorBreakdown {
    /// Returns a copy with every factor rounded to one decimal, for
    /// tooltips.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            poi_density_score: round_to(self.poi_density_score, 1),
            commercial_score: round_to(self.commercial_score, 1),
            residential_score: round_to(self.residential_score, 1),
            competitor_penalty: round_to(self.competitor_penalty, 1),
            accessibility_score: round_to(self.accessibility_score, 1),
        }
    }
}

/// Scored grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Grid cell identifier.
    pub grid_id: i64,
    /// POI count of the cell.
    pub poi_count: u32,
    /// POI density of the cell.
    pub poi_density: f64,
    /// Neighbor POI density of the cell.
    pub neighbor_poi_density: f64,
    /// Cell centroid, if known.
    pub centroid: Option<Coordinates>,
    /// Same-category POIs within the competitor radius.
    pub competitor_count: u32,
    /// Raw score.
    pub score: f64,
    /// Score rescaled to 0-100.
    pub normalized_score: f64,
    /// Competition rank (1 = best; ties share a rank).
    pub rank: u32,
    /// Factor breakdown, present only in advanced mode.
    pub factors: Option<FactorBreakdown>,
}

/// A complete scoring run for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    /// Category being sited.
    pub category: PoiCategory,
    /// Formula that produced the scores.
    pub mode: ScoringMode,
    /// Scored cells, sorted by descending score.
    pub results: Vec<ScoreResult>,
}

/// Growth classification tier.
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
pub enum GrowthTier {
    /// Growth potential in `(0, 40]`, or anything outside the tier bins.
    Stable,
    /// Growth potential in `(40, 60]`.
    Growing,
    /// Growth potential in `(60, 80]`.
    #[serde(rename = "High Growth")]
    #[strum(serialize = "High Growth")]
    HighGrowth,
    /// Growth potential in `(80, 100]`.
    #[serde(rename = "Emerging Hotspot")]
    #[strum(serialize = "Emerging Hotspot")]
    EmergingHotspot,
}

impl GrowthTier {
    /// Assigns a tier using right-inclusive bins `(0,40]`, `(40,60]`,
    /// `(60,80]`, `(80,100]`.
    ///
    /// Values that fall in no bin (zero, negative, above 100, NaN) are
    /// [`Self::Stable`].
    #[must_use]
    pub fn from_potential(growth_potential: f64) -> Self {
        if growth_potential > 80.0 && growth_potential <= 100.0 {
            Self::EmergingHotspot
        } else if growth_potential > 60.0 && growth_potential <= 80.0 {
            Self::HighGrowth
        } else if growth_potential > 40.0 && growth_potential <= 60.0 {
            Self::Growing
        } else {
            Self::Stable
        }
    }
}

/// Growth classification of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    /// Grid cell identifier.
    pub grid_id: i64,
    /// POI density of the cell.
    pub poi_density: f64,
    /// Neighbor POI density of the cell.
    pub neighbor_poi_density: f64,
    /// Cell centroid, if known.
    pub centroid: Option<Coordinates>,
    /// Growth potential on a 0-100 scale.
    pub growth_potential: f64,
    /// Whether the cell is at or above the hotspot percentile.
    pub is_hotspot: bool,
    /// Tier derived from the growth potential.
    pub tier: GrowthTier,
}

/// Growth classification of a whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAnalysis {
    /// Percentile (0-100) used for the hotspot threshold.
    pub percentile: f64,
    /// Growth potential at that percentile, `None` for an empty grid.
    pub threshold: Option<f64>,
    /// Classified cells, sorted by descending growth potential.
    pub results: Vec<GrowthResult>,
}

impl GrowthAnalysis {
    /// Cells flagged as hotspots, best first.
    pub fn hotspots(&self) -> impl Iterator<Item = &GrowthResult> {
        self.results.iter().filter(|r| r.is_hotspot)
    }

    /// Mean growth potential across all cells.
    #[must_use]
    pub fn mean_potential(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let sum: f64 = self.results.iter().map(|r| r.growth_potential).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.results.len() as f64;
        Some(sum / count)
    }

    /// Highest growth potential.
    #[must_use]
    pub fn max_potential(&self) -> Option<f64> {
        self.results
            .iter()
            .map(|r| r.growth_potential)
            .max_by(f64::total_cmp)
    }

    /// Number of cells per tier.
    #[must_use]
    pub fn tier_counts(&self) -> BTreeMap<GrowthTier, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.results {
            *counts.entry(r.tier).or_insert(0) += 1;
        }
        counts
    }
}

/// Demand reading of an advanced-mode cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum DemandLevel {
    /// `poiDensityScore > 70`
    #[strum(serialize = "High demand zone")]
    High,
    /// `poiDensityScore > 40`
    #[strum(serialize = "Moderate demand")]
    Moderate,
    /// Everything else.
    #[strum(serialize = "Low activity area")]
    Low,
}

/// Competition reading of an advanced-mode cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum CompetitionPressure {
    /// Penalty above 70.
    #[strum(serialize = "High competition")]
    High,
    /// Penalty above 40.
    #[strum(serialize = "Moderate competition")]
    Moderate,
    /// Everything else.
    #[strum(serialize = "Low competition (opportunity!)")]
    Low,
}

/// Overall suitability of an advanced-mode cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Suitability {
    /// Score above 60.
    #[strum(serialize = "Excellent location - highly recommended")]
    Excellent,
    /// Score above 40.
    #[strum(serialize = "Good location - worth considering")]
    Good,
    /// Score above 20.
    #[strum(serialize = "Average location - proceed with caution")]
    Average,
    /// Everything else.
    #[strum(serialize = "Poor location - not recommended")]
    Poor,
}

/// Human-readable explanation of an advanced-mode score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreExplanation {
    /// Demand reading.
    pub demand: DemandLevel,
    /// Competition reading.
    pub competition: CompetitionPressure,
    /// Overall recommendation.
    pub recommendation: Suitability,
}
