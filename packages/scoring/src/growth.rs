//! Growth hotspot classification.
//!
//! A cell has growth potential when it is busy itself but its
//! surroundings are not yet: `density_norm * 0.6 + (100 - neighbor_norm) *
//! 0.4`, where both norms are relative to the grid maximum. Cells at or
//! above the configured percentile of growth potential are hotspots.

use locate_ncr_grid_models::GridCell;
use locate_ncr_scoring_models::{GrowthAnalysis, GrowthResult, GrowthTier};

use crate::rank::descending;

/// Default hotspot percentile.
pub const DEFAULT_HOTSPOT_PERCENTILE: f64 = 75.0;

/// Growth potential of every cell when the grid has no density signal.
pub const NEUTRAL_GROWTH: f64 = 50.0;

const OWN_DENSITY_WEIGHT: f64 = 0.6;
const OPEN_NEIGHBORHOOD_WEIGHT: f64 = 0.4;

/// Linear-interpolation quantile of `values` at `q` in `[0, 1]`.
///
/// The sample is sorted and the value at fractional position `(n - 1) * q`
/// is interpolated between its two neighbors. NaN values are ignored;
/// returns `None` when nothing is left.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile_linear(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let t = position - position.floor();

    let a = sorted[lower];
    let b = sorted[upper];
    // Interpolate from the nearer end for symmetric rounding.
    Some(if t >= 0.5 {
        b - (b - a) * (1.0 - t)
    } else {
        a + (b - a) * t
    })
}

/// Growth potential of every cell, parallel to `cells`.
///
/// If either the highest density or the highest neighbor density is not
/// positive, every cell gets [`NEUTRAL_GROWTH`].
#[must_use]
#[allow(clippy::suggest_mul_add)]
pub fn growth_potentials(cells: &[GridCell]) -> Vec<f64> {
    let density_max = cells
        .iter()
        .map(|c| c.poi_density)
        .fold(f64::NEG_INFINITY, f64::max);
    let neighbor_max = cells
        .iter()
        .map(|c| c.neighbor_poi_density)
        .fold(f64::NEG_INFINITY, f64::max);

    if density_max <= 0.0 || neighbor_max <= 0.0 {
        return vec![NEUTRAL_GROWTH; cells.len()];
    }

    cells
        .iter()
        .map(|c| {
            let density_norm = c.poi_density / density_max * 100.0;
            let neighbor_norm = c.neighbor_poi_density / neighbor_max * 100.0;
            density_norm * OWN_DENSITY_WEIGHT + (100.0 - neighbor_norm) * OPEN_NEIGHBORHOOD_WEIGHT
        })
        .collect()
}

/// Classifies every cell by growth potential.
///
/// `percentile` is on a 0-100 scale. Results are sorted by descending
/// growth potential; equal potentials keep their input order.
#[must_use]
pub fn classify_growth(cells: &[GridCell], percentile: f64) -> GrowthAnalysis {
    let potentials = growth_potentials(cells);
    let threshold = quantile_linear(&potentials, percentile / 100.0);

    let mut results: Vec<GrowthResult> = cells
        .iter()
        .zip(potentials)
        .map(|(cell, growth_potential)| GrowthResult {
            grid_id: cell.id,
            poi_density: cell.poi_density,
            neighbor_poi_density: cell.neighbor_poi_density,
            centroid: cell.centroid,
            growth_potential,
            is_hotspot: threshold.is_some_and(|t| growth_potential >= t),
            tier: GrowthTier::from_potential(growth_potential),
        })
        .collect();

    results.sort_by(|a, b| descending(a.growth_potential, b.growth_potential));

    log::debug!(
        "Classified {} cells, {} hotspots at the {percentile}th percentile ({threshold:?})",
        results.len(),
        results.iter().filter(|r| r.is_hotspot).count()
    );

    GrowthAnalysis {
        percentile,
        threshold,
        results,
    }
}
