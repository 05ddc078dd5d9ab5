//! Competition ranking of scored cells.

use std::cmp::Ordering;

use locate_ncr_scoring_models::ScoreResult;

/// Descending order on `f64` with NaN sorted last.
#[must_use]
pub fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Sorts results by descending score and assigns competition ranks.
///
/// The sort is stable, so tied cells keep their input order. A cell's rank
/// is one plus the number of cells with a strictly greater score, so ties
/// share a rank and the next distinct score skips ahead (1, 2, 2, 4).
#[allow(clippy::float_cmp)]
pub fn rank_and_sort(results: &mut [ScoreResult]) {
    results.sort_by(|a, b| descending(a.score, b.score));

    let mut previous: Option<(f64, u32)> = None;
    for (i, result) in results.iter_mut().enumerate() {
        let position = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let rank = match previous {
            Some((score, rank)) if score == result.score => rank,
            _ => position,
        };
        result.rank = rank;
        previous = Some((result.score, rank));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(grid_id: i64, score: f64) -> ScoreResult {
        ScoreResult {
            grid_id,
            poi_count: 0,
            poi_density: 0.0,
            neighbor_poi_density: 0.0,
            centroid: None,
            competitor_count: 0,
            score,
            normalized_score: score,
            rank: 0,
            factors: None,
        }
    }

    #[test]
    fn ties_share_rank_and_skip() {
        let mut results = vec![
            result(1, 5.0),
            result(2, 9.0),
            result(3, 7.0),
            result(4, 9.0),
            result(5, 1.0),
        ];

        rank_and_sort(&mut results);

        let order: Vec<(i64, u32)> = results.iter().map(|r| (r.grid_id, r.rank)).collect();
        assert_eq!(order, vec![(2, 1), (4, 1), (3, 3), (1, 4), (5, 5)]);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn higher_score_never_ranks_worse() {
        let mut results: Vec<ScoreResult> = [3.0, 1.0, 3.0, 2.0, 2.0, 2.0, 0.5]
            .iter()
            .zip(1..)
            .map(|(&s, id)| result(id, s))
            .collect();

        rank_and_sort(&mut results);

        for a in &results {
            for b in &results {
                if a.score > b.score {
                    assert!(a.rank < b.rank, "{a:?} should outrank {b:?}");
                }
                if a.score == b.score {
                    assert_eq!(a.rank, b.rank);
                }
            }
        }
    }

    #[test]
    fn nan_scores_sort_last() {
        let mut results = vec![result(1, f64::NAN), result(2, 4.0), result(3, 8.0)];
        rank_and_sort(&mut results);

        assert_eq!(results[0].grid_id, 3);
        assert_eq!(results[1].grid_id, 2);
        assert_eq!(results[2].grid_id, 1);
        assert_eq!(results[2].rank, 3);
    }

    #[test]
    fn empty_input_is_noop() {
        let mut results: Vec<ScoreResult> = vec![];
        rank_and_sort(&mut results);
        assert!(results.is_empty());
    }
}
