#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site recommendation scoring.
//!
//! Scores every grid cell for a POI category by weighing local demand
//! against nearby same-category competition, in one of two modes:
//!
//! 1. **Basic**: `density * demand_weight - competitors * penalty * 5`,
//!    then min-max normalized to 0-100.
//! 2. **Advanced**: a weighted sum of five 0-100 factors (density,
//!    commercial activity, residential suitability, accessibility, and a
//!    competitor penalty), clamped to 0-100.
//!
//! Both modes finish with competition ranking (ties share a rank). Weight
//! tables come from [`weights::WeightConfig`] and are passed into every
//! call. The crate also classifies growth hotspots ([`growth`]) and
//! produces plain-language explanations ([`explain`]).

pub mod advanced;
pub mod basic;
pub mod explain;
pub mod growth;
pub mod normalize;
pub mod rank;
pub mod weights;

use locate_ncr_grid_models::{GridCell, PoiCategory, PoiRecord};
use locate_ncr_scoring_models::{RecommendationSet, ScoreResult, ScoringMode};
use locate_ncr_spatial::{
    ADVANCED_COMPETITOR_RADIUS_KM, BASIC_COMPETITOR_RADIUS_KM, competitor_counts,
};

pub use advanced::score_advanced;
pub use basic::{basic_score, score_basic};
pub use growth::classify_growth;
pub use weights::WeightConfig;

/// Errors from loading scoring configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// Weight table TOML could not be parsed.
    #[error("Invalid weight configuration: {message}")]
    Config { message: String },

    /// A weight table lacks the entry it falls back to.
    #[error("Weight table '{table}' has no '{key}' entry")]
    MissingProfile { table: &'static str, key: String },
}

/// Scores and ranks every cell for `category`.
///
/// `competitors` are the existing same-category POIs. Advanced mode needs
/// them: with an empty competitor set the request is served by the basic
/// formula instead, and the returned [`RecommendationSet::mode`] says so.
#[must_use]
pub fn recommend(
    cells: &[GridCell],
    competitors: &[PoiRecord],
    category: PoiCategory,
    mode: ScoringMode,
    config: &WeightConfig,
) -> RecommendationSet {
    let mode = if mode == ScoringMode::Advanced && competitors.is_empty() {
        log::debug!("No {category} competitors supplied, using basic scoring");
        ScoringMode::Basic
    } else {
        mode
    };

    log::debug!(
        "Scoring {} cells for {category} ({mode} mode, {} competitors)",
        cells.len(),
        competitors.len()
    );

    let results = match mode {
        ScoringMode::Basic => {
            let counts = competitor_counts(cells, competitors, BASIC_COMPETITOR_RADIUS_KM);
            score_basic(cells, &counts, config.basic_weights(category))
        }
        ScoringMode::Advanced => {
            let counts = competitor_counts(cells, competitors, ADVANCED_COMPETITOR_RADIUS_KM);
            score_advanced(
                cells,
                Some(&counts),
                category.prefers_quiet(),
                config.advanced_weights(category),
                &config.calibration,
            )
        }
    };

    RecommendationSet {
        category,
        mode,
        results,
    }
}

/// The first `n` rows of an already sorted result list.
#[must_use]
pub fn top_recommendations(results: &[ScoreResult], n: usize) -> &[ScoreResult] {
    &results[..n.min(results.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use locate_ncr_grid_models::Coordinates;

    fn at(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    fn grid() -> Vec<GridCell> {
        vec![
            GridCell::new(1, 10, 1.0).with_centroid(at(28.60, 77.20)),
            GridCell::new(2, 40, 1.0).with_centroid(at(28.70, 77.30)),
            GridCell::new(3, 25, 1.0).with_centroid(at(28.80, 77.40)),
        ]
    }

    #[test]
    fn advanced_without_competitors_falls_back_to_basic() {
        let set = recommend(
            &grid(),
            &[],
            PoiCategory::Atm,
            ScoringMode::Advanced,
            &WeightConfig::embedded(),
        );

        assert_eq!(set.mode, ScoringMode::Basic);
        assert_eq!(set.results[0].grid_id, 2);
        assert!(set.results.iter().all(|r| r.factors.is_none()));
    }

    #[test]
    fn advanced_with_competitors_reports_factors() {
        let competitors = vec![PoiRecord::new(1, PoiCategory::Atm, Some(at(28.70, 77.30)))];
        let set = recommend(
            &grid(),
            &competitors,
            PoiCategory::Atm,
            ScoringMode::Advanced,
            &WeightConfig::embedded(),
        );

        assert_eq!(set.mode, ScoringMode::Advanced);
        assert_eq!(set.results.len(), 3);
        assert!(set.results.iter().all(|r| r.factors.is_some()));

        let cell2 = set.results.iter().find(|r| r.grid_id == 2).unwrap();
        assert_eq!(cell2.competitor_count, 1);
    }

    #[test]
    fn competitor_radius_depends_on_mode() {
        // ~1.8 km north of cell 1: inside the basic radius, outside the
        // advanced one.
        let competitors = vec![PoiRecord::new(1, PoiCategory::Atm, Some(at(28.6162, 77.20)))];
        let config = WeightConfig::embedded();
        let count_for_cell_1 = |set: &RecommendationSet| {
            set.results
                .iter()
                .find(|r| r.grid_id == 1)
                .map(|r| r.competitor_count)
                .unwrap()
        };

        let basic = recommend(&grid(), &competitors, PoiCategory::Atm, ScoringMode::Basic, &config);
        let advanced = recommend(
            &grid(),
            &competitors,
            PoiCategory::Atm,
            ScoringMode::Advanced,
            &config,
        );

        assert_eq!(basic.mode, ScoringMode::Basic);
        assert_eq!(advanced.mode, ScoringMode::Advanced);
        assert_eq!(count_for_cell_1(&basic), 1);
        assert_eq!(count_for_cell_1(&advanced), 0);
    }

    #[test]
    fn basic_ranks_are_sequential_for_distinct_scores() {
        let set = recommend(
            &grid(),
            &[],
            PoiCategory::Hospital,
            ScoringMode::Basic,
            &WeightConfig::embedded(),
        );

        let ranks: Vec<u32> = set.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!((set.results[0].normalized_score - 100.0).abs() < 1e-9);
        assert!(set.results[2].normalized_score.abs() < 1e-9);

        let top = top_recommendations(&set.results, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].grid_id, 2);
        assert_eq!(top_recommendations(&set.results, 10).len(), 3);
    }
}
