//! Score rescaling to 0-100.

/// Score assigned to every cell when all scores are equal.
pub const FLAT_SCORE: f64 = 50.0;

/// Minimum score spread that advanced mode will stretch to 0-100.
pub const ADVANCED_NORMALIZE_SPREAD: f64 = 10.0;

/// Smallest and largest non-NaN value, or `None` if there are none.
fn bounds(scores: &[f64]) -> Option<(f64, f64)> {
    scores
        .iter()
        .copied()
        .filter(|s| !s.is_nan())
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
}

/// Min-max rescale of `scores` to 0-100.
///
/// When every score is equal (or there is nothing to compare) each cell
/// gets [`FLAT_SCORE`].
#[must_use]
pub fn normalize_min_max(scores: &[f64]) -> Vec<f64> {
    match bounds(scores) {
        Some((min, max)) if max > min => scores
            .iter()
            .map(|s| (s - min) / (max - min) * 100.0)
            .collect(),
        _ => vec![FLAT_SCORE; scores.len()],
    }
}

/// Min-max rescale only when the spread exceeds `min_spread`; otherwise
/// the scores are returned unchanged.
#[must_use]
pub fn normalize_if_spread(scores: &[f64], min_spread: f64) -> Vec<f64> {
    match bounds(scores) {
        Some((min, max)) if max - min > min_spread => scores
            .iter()
            .map(|s| (s - min) / (max - min) * 100.0)
            .collect(),
        _ => scores.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescales_to_full_range() {
        let result = normalize_min_max(&[10.0, 20.0, 30.0]);
        assert_eq!(result, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn flat_scores_become_fifty() {
        assert_eq!(normalize_min_max(&[7.0, 7.0, 7.0]), vec![50.0, 50.0, 50.0]);
        assert_eq!(normalize_min_max(&[-3.0]), vec![50.0]);
        assert!(normalize_min_max(&[]).is_empty());
    }

    #[test]
    fn narrow_spread_left_alone() {
        let scores = [40.0, 45.0, 50.0];
        assert_eq!(normalize_if_spread(&scores, ADVANCED_NORMALIZE_SPREAD), scores.to_vec());
    }

    #[test]
    fn wide_spread_rescaled() {
        let result = normalize_if_spread(&[20.0, 40.0, 60.0], ADVANCED_NORMALIZE_SPREAD);
        assert_eq!(result, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn spread_of_exactly_threshold_is_not_rescaled() {
        let scores = [30.0, 40.0];
        assert_eq!(normalize_if_spread(&scores, ADVANCED_NORMALIZE_SPREAD), scores.to_vec());
    }
}
