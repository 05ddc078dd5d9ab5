//! Catchment coverage and population estimate.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use locate_ncr_grid_models::{Coordinates, GridCell, PoiRecord};
use locate_ncr_scoring_models::round_to;
use locate_ncr_spatial::{PoiIndex, haversine_km};

use crate::CatchmentMetrics;

/// Assumed urban residents per square kilometer at average density.
pub const PEOPLE_PER_SQ_KM: f64 = 5000.0;

/// Population estimate for a circle of `area_sq_km` whose cells average
/// `avg_density` POIs per square kilometer.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_population(area_sq_km: f64, avg_density: f64) -> u64 {
    (area_sq_km * PEOPLE_PER_SQ_KM * (avg_density / 100.0 + 0.5)).floor() as u64
}

/// Summarizes the POIs and grid cells within `radius_km` of `center`.
///
/// POIs and cells without coordinates are ignored. The population
/// estimate uses the unrounded area and average density.
#[must_use]
pub fn catchment_metrics(
    center: Coordinates,
    radius_km: f64,
    all_pois: &[PoiRecord],
    cells: &[GridCell],
) -> CatchmentMetrics {
    let index = PoiIndex::new(all_pois);
    let hits = index.within(center, radius_km);

    let mut category_breakdown = BTreeMap::new();
    for hit in &hits {
        *category_breakdown
            .entry(hit.poi.category.as_ref().to_string())
            .or_insert(0) += 1;
    }

    let covered: Vec<&GridCell> = cells
        .iter()
        .filter(|cell| {
            cell.centroid
                .is_some_and(|c| haversine_km(center, c) <= radius_km)
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let avg_density = if covered.is_empty() {
        0.0
    } else {
        covered.iter().map(|c| c.poi_density).sum::<f64>() / covered.len() as f64
    };

    let area_sq_km = PI * radius_km * radius_km;

    log::debug!(
        "Catchment {radius_km} km: {} POIs, {} cells",
        hits.len(),
        covered.len()
    );

    CatchmentMetrics {
        radius_km,
        area_sq_km: round_to(area_sq_km, 2),
        poi_count_in_radius: hits.len(),
        category_breakdown,
        grid_cells_covered: covered.len(),
        avg_density: round_to(avg_density, 1),
        estimated_population: estimate_population(area_sq_km, avg_density),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locate_ncr_grid_models::PoiCategory;

    fn at(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    #[test]
    fn counts_pois_and_cells_in_radius() {
        let center = at(28.6, 77.2);
        let pois = vec![
            PoiRecord::new(1, PoiCategory::Atm, Some(at(28.601, 77.2))),
            PoiRecord::new(2, PoiCategory::Atm, Some(at(28.602, 77.201))),
            PoiRecord::new(3, PoiCategory::Hospital, Some(at(28.603, 77.2))),
            PoiRecord::new(4, PoiCategory::Mall, Some(at(28.7, 77.2))),
            PoiRecord::new(5, PoiCategory::Mall, None),
        ];
        let cells = vec![
            GridCell::new(1, 30, 1.0).with_centroid(at(28.6, 77.2)),
            GridCell::new(2, 51, 1.0).with_centroid(at(28.605, 77.2)),
            GridCell::new(3, 99, 1.0).with_centroid(at(28.8, 77.2)),
            GridCell::new(4, 99, 1.0),
        ];

        let metrics = catchment_metrics(center, 1.0, &pois, &cells);

        assert_eq!(metrics.poi_count_in_radius, 3);
        assert_eq!(metrics.category_breakdown.get("atm"), Some(&2));
        assert_eq!(metrics.category_breakdown.get("hospital"), Some(&1));
        assert!(!metrics.category_breakdown.contains_key("mall"));
        assert_eq!(metrics.grid_cells_covered, 2);
        assert!((metrics.avg_density - 40.5).abs() < 1e-9);
        assert!((metrics.area_sq_km - 3.14).abs() < 1e-9);
        // pi * 5000 * (0.405 + 0.5)
        assert_eq!(metrics.estimated_population, 14_215);
    }

    #[test]
    fn empty_catchment_uses_base_population() {
        let metrics = catchment_metrics(at(28.6, 77.2), 2.0, &[], &[]);

        assert_eq!(metrics.poi_count_in_radius, 0);
        assert_eq!(metrics.grid_cells_covered, 0);
        assert!(metrics.avg_density.abs() < f64::EPSILON);
        assert!((metrics.area_sq_km - 12.57).abs() < 1e-9);
        // 4 pi * 5000 * 0.5
        assert_eq!(metrics.estimated_population, 31_415);
    }
}
