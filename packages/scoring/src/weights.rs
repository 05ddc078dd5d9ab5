//! Category weight tables.
//!
//! The built-in tables are TOML files under `config/`, embedded at compile
//! time. Callers may also parse their own tables with
//! [`WeightConfig::from_toml_str`] and pass them to every scoring call.

use std::collections::BTreeMap;

use locate_ncr_grid_models::PoiCategory;
use serde::{Deserialize, Serialize};

use crate::ScoringError;

const BASIC_TOML: &str = include_str!("../config/basic.toml");
const ADVANCED_TOML: &str = include_str!("../config/advanced.toml");

/// Key of the catch-all entry in the advanced table.
pub const DEFAULT_PROFILE: &str = "default";

/// Basic-mode weights for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    /// Multiplier applied to POI density.
    pub demand_weight: f64,
    /// Penalty per nearby competitor (scaled by 5).
    pub competition_penalty: f64,
}

/// Last-resort basic weights if a table has neither the category nor its
/// fallback. Matches the built-in `atm` entry.
const FALLBACK_BASIC: CategoryWeights = CategoryWeights {
    demand_weight: 0.8,
    competition_penalty: 1.2,
};

/// Advanced-mode weights for one category.
///
/// Every key is optional; see the `*_weight` accessors for the values used
/// when a key is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedWeights {
    /// Weight of the density factor.
    pub poi_density: Option<f64>,
    /// Weight of the commercial factor.
    pub commercial_density: Option<f64>,
    /// Weight subtracted per point of competitor penalty.
    pub competitor_penalty: Option<f64>,
    /// Weight of the residential factor; wins over `residential_density`.
    pub residential_bonus: Option<f64>,
    /// Weight of the residential factor when no bonus is set.
    pub residential_density: Option<f64>,
    /// Weight of the accessibility factor.
    pub accessibility_bonus: Option<f64>,
    /// Not used in the weighted sum.
    pub population_bonus: Option<f64>,
    /// Not used in the weighted sum.
    pub hospital_proximity: Option<f64>,
    /// Not used in the weighted sum.
    pub safety_factor: Option<f64>,
}

const EMPTY_ADVANCED: AdvancedWeights = AdvancedWeights {
    poi_density: None,
    commercial_density: None,
    competitor_penalty: None,
    residential_bonus: None,
    residential_density: None,
    accessibility_bonus: None,
    population_bonus: None,
    hospital_proximity: None,
    safety_factor: None,
};

impl AdvancedWeights {
    /// Weight of the density factor (default 0.25).
    #[must_use]
    pub fn poi_density_weight(&self) -> f64 {
        self.poi_density.unwrap_or(0.25)
    }

    /// Weight of the commercial factor (default 0.25).
    #[must_use]
    pub fn commercial_weight(&self) -> f64 {
        self.commercial_density.unwrap_or(0.25)
    }

    /// Weight of the residential factor: `residential_bonus`, else
    /// `residential_density`, else 0.15.
    #[must_use]
    pub fn residential_weight(&self) -> f64 {
        self.residential_bonus
            .or(self.residential_density)
            .unwrap_or(0.15)
    }

    /// Weight of the accessibility factor (default 0.10).
    #[must_use]
    pub fn accessibility_weight(&self) -> f64 {
        self.accessibility_bonus.unwrap_or(0.10)
    }

    /// Weight of the competitor penalty (default 0.30).
    #[must_use]
    pub fn competitor_penalty_weight(&self) -> f64 {
        self.competitor_penalty.unwrap_or(0.30)
    }
}

/// Heuristic constants of the advanced factors.
///
/// The defaults are the calibrated values; they are exposed so alternative
/// calibrations can be tried without touching the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedCalibration {
    /// Share of the density score counted as commercial activity.
    pub commercial_factor: f64,
    /// Density score (0-100) at which residential suitability peaks.
    pub residential_peak: f64,
    /// Residential points lost per point of distance from the peak.
    pub residential_slope: f64,
    /// Penalty points per competitor; 100 is reached at `100 / this`.
    pub penalty_per_competitor: f64,
}

impl Default for AdvancedCalibration {
    fn default() -> Self {
        Self {
            commercial_factor: 0.9,
            residential_peak: 30.0,
            residential_slope: 1.5,
            penalty_per_competitor: 20.0,
        }
    }
}

/// Basic weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicWeightTable {
    /// Category whose weights stand in for unlisted categories.
    pub fallback: String,
    /// Weights keyed by category name.
    pub categories: BTreeMap<String, CategoryWeights>,
}

/// Advanced weight table. Must contain a [`DEFAULT_PROFILE`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedWeightTable {
    /// Weights keyed by category name.
    pub categories: BTreeMap<String, AdvancedWeights>,
}

/// All scoring configuration, passed explicitly into each scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Basic-mode table.
    pub basic: BasicWeightTable,
    /// Advanced-mode table.
    pub advanced: AdvancedWeightTable,
    /// Advanced-mode heuristic constants.
    #[serde(default)]
    pub calibration: AdvancedCalibration,
}

impl WeightConfig {
    /// Returns the built-in weight tables.
    ///
    /// # Panics
    ///
    /// Panics if an embedded TOML table is malformed. The tables are
    /// compile-time constants, so this is a development error caught by
    /// the tests below.
    #[must_use]
    pub fn embedded() -> Self {
        let basic: BasicWeightTable = toml::de::from_str(BASIC_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded basic weights: {e}"));
        let advanced: AdvancedWeightTable = toml::de::from_str(ADVANCED_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded advanced weights: {e}"));

        Self {
            basic,
            advanced,
            calibration: AdvancedCalibration::default(),
        }
    }

    /// Parses a complete configuration with `[basic]`, `[advanced]`, and an
    /// optional `[calibration]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Config`] if the TOML is malformed, or
    /// [`ScoringError::MissingProfile`] if a table lacks its fallback entry.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ScoringError> {
        let config: Self = toml::de::from_str(toml_str).map_err(|e| ScoringError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ScoringError> {
        if !self.basic.categories.contains_key(&self.basic.fallback) {
            return Err(ScoringError::MissingProfile {
                table: "basic",
                key: self.basic.fallback.clone(),
            });
        }
        if !self.advanced.categories.contains_key(DEFAULT_PROFILE) {
            return Err(ScoringError::MissingProfile {
                table: "advanced",
                key: DEFAULT_PROFILE.to_string(),
            });
        }
        Ok(())
    }

    /// Basic weights for `category`, falling back to the table's fallback
    /// category.
    #[must_use]
    pub fn basic_weights(&self, category: PoiCategory) -> CategoryWeights {
        let table = &self.basic.categories;
        table
            .get(category.as_ref())
            .or_else(|| table.get(&self.basic.fallback))
            .copied()
            .unwrap_or(FALLBACK_BASIC)
    }

    /// Advanced weights for `category`, falling back to the `default`
    /// profile.
    #[must_use]
    pub fn advanced_weights(&self, category: PoiCategory) -> &AdvancedWeights {
        let table = &self.advanced.categories;
        table
            .get(category.as_ref())
            .or_else(|| table.get(DEFAULT_PROFILE))
            .unwrap_or(&EMPTY_ADVANCED)
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::embedded()
    }
}
