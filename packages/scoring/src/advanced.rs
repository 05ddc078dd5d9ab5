//! Multi-factor scoring.
//!
//! Each cell gets five factor scores on a 0-100 scale, combined with the
//! category's [`AdvancedWeights`]:
//!
//! | Factor | Formula |
//! |---|---|
//! | density | `density / max(density) * 100` |
//! | commercial | `density_score * 0.9`, inverted for quiet categories |
//! | residential | `100 - abs(density_score - 30) * 1.5`, clamped |
//! | accessibility | `ln(1 + count) / ln(1 + max(count)) * 100` |
//! | competitor penalty | `competitors * 20`, clamped |
//!
//! The constants in the table are the [`AdvancedCalibration`] defaults.

use locate_ncr_grid_models::GridCell;
use locate_ncr_scoring_models::{FactorBreakdown, ScoreResult};

use crate::normalize::{ADVANCED_NORMALIZE_SPREAD, normalize_if_spread};
use crate::rank::rank_and_sort;
use crate::weights::{AdvancedCalibration, AdvancedWeights};

/// Accessibility score when no cell has any POIs.
const NEUTRAL_ACCESSIBILITY: f64 = 50.0;

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

/// `value / max * 100`, or 0 when `max` is not positive.
fn relative_to(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max * 100.0 } else { 0.0 }
}

/// Competitor penalty for `count` nearby competitors, saturating at 100.
#[must_use]
pub fn competitor_penalty(count: u32, calibration: &AdvancedCalibration) -> f64 {
    (f64::from(count) * calibration.penalty_per_competitor).clamp(0.0, 100.0)
}

/// Residential suitability of a density score: a triangle peaking at the
/// calibrated peak.
#[must_use]
pub fn residential_score(poi_density_score: f64, calibration: &AdvancedCalibration) -> f64 {
    let distance = (poi_density_score - calibration.residential_peak).abs();
    (100.0 - distance * calibration.residential_slope).clamp(0.0, 100.0)
}

/// Weighted sum of the factors, clamped to 0-100.
#[must_use]
#[allow(clippy::suggest_mul_add)]
pub fn weighted_score(factors: &FactorBreakdown, weights: &AdvancedWeights) -> f64 {
    let score = factors.poi_density_score * weights.poi_density_weight()
        + factors.commercial_score * weights.commercial_weight()
        + factors.residential_score * weights.residential_weight()
        + factors.accessibility_score * weights.accessibility_weight()
        - factors.competitor_penalty * weights.competitor_penalty_weight();

    score.clamp(0.0, 100.0)
}

/// Scores every cell with the multi-factor formula and ranks them.
///
/// With `competitor_counts` (parallel to `cells`) the penalty saturates at
/// `100 / penalty_per_competitor` competitors. Without them the penalty is
/// the cell's neighbor density relative to the highest neighbor density.
///
/// `weights` are used as given, so callers may pass the table entry for a
/// category or a custom set. `normalized_score` is only stretched to 0-100
/// when the scores span more than 10 points.
#[must_use]
pub fn score_advanced(
    cells: &[GridCell],
    competitor_counts: Option<&[u32]>,
    prefers_quiet: bool,
    weights: &AdvancedWeights,
    calibration: &AdvancedCalibration,
) -> Vec<ScoreResult> {
    let density_max = max_of(cells.iter().map(|c| c.poi_density));
    let neighbor_max = max_of(cells.iter().map(|c| c.neighbor_poi_density));
    let count_max = cells.iter().map(|c| c.poi_count).max().unwrap_or(0);
    let log_count_max = f64::from(count_max).ln_1p();

    let factors: Vec<(u32, FactorBreakdown)> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let poi_density_score = relative_to(cell.poi_density, density_max);

            let commercial = poi_density_score * calibration.commercial_factor;
            let commercial_score = if prefers_quiet {
                100.0 - commercial
            } else {
                commercial
            };

            let (competitor_count, penalty) = match competitor_counts {
                Some(counts) => {
                    let count = counts.get(i).copied().unwrap_or(0);
                    (count, competitor_penalty(count, calibration))
                }
                None => (0, relative_to(cell.neighbor_poi_density, neighbor_max)),
            };

            let accessibility_score = if count_max > 0 {
                f64::from(cell.poi_count).ln_1p() / log_count_max * 100.0
            } else {
                NEUTRAL_ACCESSIBILITY
            };

            (
                competitor_count,
                FactorBreakdown {
                    poi_density_score,
                    commercial_score,
                    residential_score: residential_score(poi_density_score, calibration),
                    competitor_penalty: penalty,
                    accessibility_score,
                },
            )
        })
        .collect();

    let scores: Vec<f64> = factors
        .iter()
        .map(|(_, f)| weighted_score(f, weights))
        .collect();
    let normalized = normalize_if_spread(&scores, ADVANCED_NORMALIZE_SPREAD);

    let mut results: Vec<ScoreResult> = cells
        .iter()
        .zip(factors)
        .zip(scores.into_iter().zip(normalized))
        .map(
            |((cell, (competitor_count, factors)), (score, normalized_score))| ScoreResult {
                grid_id: cell.id,
                poi_count: cell.poi_count,
                poi_density: cell.poi_density,
                neighbor_poi_density: cell.neighbor_poi_density,
                centroid: cell.centroid,
                competitor_count,
                score,
                normalized_score,
                rank: 0,
                factors: Some(factors),
            },
        )
        .collect();

    rank_and_sort(&mut results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WeightConfig;
    use locate_ncr_grid_models::PoiCategory;

    fn cell(id: i64, poi_count: u32, neighbor: f64) -> GridCell {
        GridCell::new(id, poi_count, 1.0).with_neighbor_density(neighbor)
    }

    fn factors_of(results: &[ScoreResult], grid_id: i64) -> FactorBreakdown {
        results
            .iter()
            .find(|r| r.grid_id == grid_id)
            .and_then(|r| r.factors)
            .unwrap()
    }

    #[test]
    fn penalty_saturates_at_five_competitors() {
        let calibration = AdvancedCalibration::default();
        let penalties: Vec<f64> = (0..=9).map(|n| competitor_penalty(n, &calibration)).collect();

        for pair in penalties.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((penalties[5] - 100.0).abs() < f64::EPSILON);
        assert!((penalties[9] - 100.0).abs() < f64::EPSILON);
        assert!((penalties[3] - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn residential_peaks_at_thirty() {
        let calibration = AdvancedCalibration::default();
        assert!((residential_score(30.0, &calibration) - 100.0).abs() < f64::EPSILON);
        assert!((residential_score(50.0, &calibration) - 70.0).abs() < 1e-9);
        assert!((residential_score(100.0, &calibration) - 0.0).abs() < f64::EPSILON);
        assert!((residential_score(0.0, &calibration) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn density_score_within_bounds() {
        let cells = vec![cell(1, 0, 0.0), cell(2, 50, 0.0), cell(3, 200, 0.0)];
        let config = WeightConfig::embedded();

        let results = score_advanced(
            &cells,
            Some(&[0, 0, 0]),
            false,
            config.advanced_weights(PoiCategory::Atm),
            &config.calibration,
        );

        for r in &results {
            let f = r.factors.unwrap();
            assert!((0.0..=100.0).contains(&f.poi_density_score));
            assert!((0.0..=100.0).contains(&r.score));
        }
        assert!((factors_of(&results, 3).poi_density_score - 100.0).abs() < f64::EPSILON);
        assert!((factors_of(&results, 2).poi_density_score - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_grid_activity_is_neutral() {
        let cells = vec![cell(1, 0, 0.0), cell(2, 0, 0.0)];
        let config = WeightConfig::embedded();

        let results = score_advanced(
            &cells,
            None,
            false,
            config.advanced_weights(PoiCategory::Atm),
            &config.calibration,
        );

        for r in &results {
            let f = r.factors.unwrap();
            assert!(f.poi_density_score.abs() < f64::EPSILON);
            assert!((f.accessibility_score - 50.0).abs() < f64::EPSILON);
            assert!(f.competitor_penalty.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn accessibility_is_log_scaled_against_busiest_cell() {
        let cells = vec![cell(1, 9, 0.0), cell(2, 3, 0.0), cell(3, 0, 0.0)];
        let config = WeightConfig::embedded();

        let results = score_advanced(
            &cells,
            Some(&[0, 0, 0]),
            false,
            config.advanced_weights(PoiCategory::Atm),
            &config.calibration,
        );

        // ln(4) / ln(10) * 100
        let middle = factors_of(&results, 2).accessibility_score;
        assert!((factors_of(&results, 1).accessibility_score - 100.0).abs() < 1e-9);
        assert!((middle - 60.205_999_132_796_2).abs() < 1e-9, "got {middle}");
        assert!(factors_of(&results, 3).accessibility_score.abs() < f64::EPSILON);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn narrow_spread_keeps_raw_scores() {
        let cells = vec![cell(1, 10, 0.0), cell(2, 10, 0.0)];
        let config = WeightConfig::embedded();

        let results = score_advanced(
            &cells,
            Some(&[0, 0]),
            false,
            config.advanced_weights(PoiCategory::Atm),
            &config.calibration,
        );

        for r in &results {
            assert_eq!(r.normalized_score, r.score);
            assert_eq!(r.rank, 1);
        }
        assert!((results[0].score - 62.0).abs() < 1e-9);
    }

    #[test]
    fn quiet_categories_invert_commercial_score() {
        let cells = vec![cell(1, 100, 0.0), cell(2, 50, 0.0)];
        let config = WeightConfig::embedded();
        let weights = config.advanced_weights(PoiCategory::School);

        let quiet = score_advanced(&cells, Some(&[0, 0]), true, weights, &config.calibration);
        let busy = score_advanced(&cells, Some(&[0, 0]), false, weights, &config.calibration);

        assert!((factors_of(&busy, 1).commercial_score - 90.0).abs() < 1e-9);
        assert!((factors_of(&quiet, 1).commercial_score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn neighbor_density_stands_in_for_missing_counts() {
        let cells = vec![cell(1, 10, 20.0), cell(2, 10, 80.0)];
        let config = WeightConfig::embedded();

        let results = score_advanced(
            &cells,
            None,
            false,
            config.advanced_weights(PoiCategory::Mall),
            &config.calibration,
        );

        assert!((factors_of(&results, 1).competitor_penalty - 25.0).abs() < 1e-9);
        assert!((factors_of(&results, 2).competitor_penalty - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_sum_uses_category_weights() {
        let factors = FactorBreakdown {
            poi_density_score: 100.0,
            commercial_score: 90.0,
            residential_score: 0.0,
            competitor_penalty: 0.0,
            accessibility_score: 100.0,
        };
        let config = WeightConfig::embedded();

        // atm: 100*0.25 + 90*0.30 + 0*0.10 + 100*0.10 - 0 = 62
        let score = weighted_score(&factors, config.advanced_weights(PoiCategory::Atm));
        assert!((score - 62.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn heavy_competition_clamps_to_zero() {
        let factors = FactorBreakdown {
            poi_density_score: 0.0,
            commercial_score: 0.0,
            residential_score: 0.0,
            competitor_penalty: 100.0,
            accessibility_score: 0.0,
        };
        let score = weighted_score(&factors, &AdvancedWeights::default());
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn custom_weights_override_table() {
        let cells = vec![cell(1, 100, 0.0), cell(2, 10, 0.0)];
        let only_density = AdvancedWeights {
            poi_density: Some(1.0),
            commercial_density: Some(0.0),
            residential_bonus: Some(0.0),
            accessibility_bonus: Some(0.0),
            competitor_penalty: Some(0.0),
            ..AdvancedWeights::default()
        };

        let results = score_advanced(
            &cells,
            Some(&[0, 0]),
            false,
            &only_density,
            &AdvancedCalibration::default(),
        );

        assert_eq!(results[0].grid_id, 1);
        assert!((results[0].score - 100.0).abs() < 1e-9);
        assert!((results[1].score - 10.0).abs() < 1e-9);
        assert!((results[1].normalized_score - 0.0).abs() < 1e-9);
    }
}
