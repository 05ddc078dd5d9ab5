//! Catchment rings around recommended cells.

use locate_ncr_scoring_models::ScoreResult;
use locate_ncr_spatial::circle::{DEFAULT_CIRCLE_POINTS, create_circle};

use crate::CatchmentRing;

/// Radii drawn around each recommendation when none are given.
pub const DEFAULT_CATCHMENT_RADII_KM: [f64; 3] = [0.5, 1.0, 2.0];

const RING_RGB: [u8; 3] = [0, 245, 212];

/// Fill opacity for a ring radius. Larger rings are fainter.
#[must_use]
pub fn ring_alpha(radius_km: f64) -> u8 {
    const TOLERANCE: f64 = 1e-9;

    if (radius_km - 0.5).abs() < TOLERANCE {
        40
    } else if (radius_km - 1.0).abs() < TOLERANCE {
        25
    } else if (radius_km - 2.0).abs() < TOLERANCE {
        15
    } else {
        30
    }
}

/// Builds rings for every recommendation with a usable centroid.
///
/// Each cell gets one ring per radius, largest first so smaller rings are
/// drawn on top.
#[must_use]
pub fn catchment_layers(recommendations: &[ScoreResult], radii_km: &[f64]) -> Vec<CatchmentRing> {
    let mut radii = radii_km.to_vec();
    radii.sort_by(|a, b| b.total_cmp(a));

    let rings: Vec<CatchmentRing> = recommendations
        .iter()
        .filter_map(|r| r.centroid.filter(|c| c.is_valid()).map(|c| (r.grid_id, c)))
        .flat_map(|(grid_id, center)| {
            radii.iter().map(move |&radius_km| {
                let [r, g, b] = RING_RGB;
                CatchmentRing {
                    grid_id,
                    radius_km,
                    polygon: create_circle(center, radius_km, DEFAULT_CIRCLE_POINTS),
                    fill_color: [r, g, b, ring_alpha(radius_km)],
                }
            })
        })
        .collect();

    log::debug!(
        "Built {} catchment rings for {} recommendations",
        rings.len(),
        recommendations.len()
    );

    rings
}

#[cfg(test)]
mod tests {
    use super::*;
    use locate_ncr_grid_models::Coordinates;

    fn recommendation(grid_id: i64, centroid: Option<Coordinates>) -> ScoreResult {
        ScoreResult {
            grid_id,
            poi_count: 0,
            poi_density: 0.0,
            neighbor_poi_density: 0.0,
            centroid,
            competitor_count: 0,
            score: 0.0,
            normalized_score: 0.0,
            rank: 1,
            factors: None,
        }
    }

    #[test]
    fn rings_largest_first_with_fading_alpha() {
        let recs = vec![recommendation(7, Some(Coordinates { lat: 28.6, lng: 77.2 }))];

        let rings = catchment_layers(&recs, &DEFAULT_CATCHMENT_RADII_KM);

        let radii: Vec<f64> = rings.iter().map(|r| r.radius_km).collect();
        assert_eq!(radii, vec![2.0, 1.0, 0.5]);
        let alphas: Vec<u8> = rings.iter().map(|r| r.fill_color[3]).collect();
        assert_eq!(alphas, vec![15, 25, 40]);
        assert!(rings.iter().all(|r| r.grid_id == 7));
        assert!(rings.iter().all(|r| r.polygon.len() == DEFAULT_CIRCLE_POINTS + 1));
        assert_eq!(rings[0].fill_color[..3], [0, 245, 212]);
    }

    #[test]
    fn unlisted_radius_gets_default_alpha() {
        assert_eq!(ring_alpha(3.0), 30);
        assert_eq!(ring_alpha(0.75), 30);
    }

    #[test]
    fn cells_without_centroid_are_skipped() {
        let recs = vec![
            recommendation(1, None),
            recommendation(2, Some(Coordinates { lat: 28.6, lng: 77.2 })),
        ];

        let rings = catchment_layers(&recs, &[1.0]);

        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].grid_id, 2);
    }
}
