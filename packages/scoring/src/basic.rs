//! Basic demand-minus-competition scoring.

use locate_ncr_grid_models::GridCell;
use locate_ncr_scoring_models::ScoreResult;

use crate::normalize::normalize_min_max;
use crate::rank::rank_and_sort;
use crate::weights::CategoryWeights;

/// Multiplier applied to the per-competitor penalty.
pub const COMPETITOR_PENALTY_SCALE: f64 = 5.0;

/// Raw basic score of one cell.
#[must_use]
#[allow(clippy::suggest_mul_add)]
pub fn basic_score(poi_density: f64, competitor_count: u32, weights: CategoryWeights) -> f64 {
    poi_density * weights.demand_weight
        - f64::from(competitor_count) * weights.competition_penalty * COMPETITOR_PENALTY_SCALE
}

/// Scores every cell with the basic formula, normalizes, and ranks.
///
/// `competitor_counts` is parallel to `cells`; missing entries count as
/// zero competitors.
#[must_use]
pub fn score_basic(
    cells: &[GridCell],
    competitor_counts: &[u32],
    weights: CategoryWeights,
) -> Vec<ScoreResult> {
    let counts: Vec<u32> = (0..cells.len())
        .map(|i| competitor_counts.get(i).copied().unwrap_or(0))
        .collect();

    let scores: Vec<f64> = cells
        .iter()
        .zip(&counts)
        .map(|(cell, &count)| basic_score(cell.poi_density, count, weights))
        .collect();
    let normalized = normalize_min_max(&scores);

    let mut results: Vec<ScoreResult> = cells
        .iter()
        .zip(counts)
        .zip(scores.into_iter().zip(normalized))
        .map(|((cell, competitor_count), (score, normalized_score))| ScoreResult {
            grid_id: cell.id,
            poi_count: cell.poi_count,
            poi_density: cell.poi_density,
            neighbor_poi_density: cell.neighbor_poi_density,
            centroid: cell.centroid,
            competitor_count,
            score,
            normalized_score,
            rank: 0,
            factors: None,
        })
        .collect();

    rank_and_sort(&mut results);
    results
}
