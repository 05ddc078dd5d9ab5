//! Neighbor density approximation for stores that do not precompute it.

use locate_ncr_grid_models::GridCell;

/// Width of the centered window used for neighbor density.
pub const NEIGHBOR_WINDOW: usize = 5;

/// Centered rolling mean of `poi_density` over [`NEIGHBOR_WINDOW`] cells in
/// input order.
///
/// Cells are expected in `grid_id` order, so adjacent ids stand in for
/// spatial neighbors. Windows are truncated at either end rather than
/// dropped, so every cell gets a value.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rolling_neighbor_density(cells: &[GridCell]) -> Vec<f64> {
    let half = NEIGHBOR_WINDOW / 2;

    (0..cells.len())
        .map(|i| {
            let window = &cells[i.saturating_sub(half)..(i + half + 1).min(cells.len())];
            let sum: f64 = window.iter().map(|c| c.poi_density).sum();
            sum / window.len() as f64
        })
        .collect()
}
