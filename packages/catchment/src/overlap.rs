//! Competitors sharing a catchment.

use locate_ncr_grid_models::{Coordinates, PoiRecord};
use locate_ncr_scoring_models::round_to;
use locate_ncr_spatial::haversine_km;

use crate::{CompetitionLevel, CompetitorEntry, CompetitorOverlap, NearestCompetitor};

/// Number of in-radius competitors listed individually.
pub const MAX_LISTED_COMPETITORS: usize = 10;

/// Finds the competitors within `radius_km` of `center` and the single
/// nearest competitor overall.
///
/// Listed competitors are ordered by their rounded distance, ties keeping
/// input order. Competitors without coordinates are ignored.
#[must_use]
pub fn competitor_overlap(
    center: Coordinates,
    radius_km: f64,
    competitors: &[PoiRecord],
) -> CompetitorOverlap {
    let mut in_radius = Vec::new();
    let mut nearest: Option<(&PoiRecord, f64)> = None;

    for poi in competitors {
        let Some(coordinates) = poi.coordinates else {
            continue;
        };
        let distance = haversine_km(center, coordinates);

        if distance <= radius_km {
            in_radius.push(CompetitorEntry {
                id: poi.id,
                name: poi.display_name().to_string(),
                distance_km: round_to(distance, 2),
                coordinates,
            });
        }

        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((poi, distance));
        }
    }

    in_radius.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    let competitors_in_radius = in_radius.len();
    in_radius.truncate(MAX_LISTED_COMPETITORS);

    CompetitorOverlap {
        competitors_in_radius,
        competitors: in_radius,
        nearest: nearest.map(|(poi, distance)| NearestCompetitor {
            id: poi.id,
            name: poi.display_name().to_string(),
            distance_km: round_to(distance, 2),
        }),
        level: CompetitionLevel::from_count(competitors_in_radius),
    }
}
