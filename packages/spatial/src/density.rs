//! Competitor density and nearest-cell lookups over grid cells.

use locate_ncr_grid_models::{Coordinates, GridCell, PoiRecord};

use crate::{PoiIndex, haversine_km};

/// Counts POIs within `radius_km` (inclusive) of `center` by checking every
/// POI.
///
/// This is the reference all-pairs scan; [`competitor_counts`] produces the
/// same numbers through a [`PoiIndex`].
#[must_use]
pub fn count_within_radius(center: Coordinates, pois: &[PoiRecord], radius_km: f64) -> usize {
    pois.iter()
        .filter_map(|poi| poi.coordinates)
        .filter(|&c| haversine_km(center, c) <= radius_km)
        .count()
}

/// Counts, for every grid cell, the POIs within `radius_km` of its
/// centroid.
///
/// The returned vector is parallel to `cells`. Cells without a centroid
/// get a count of zero.
#[must_use]
pub fn competitor_counts(cells: &[GridCell], pois: &[PoiRecord], radius_km: f64) -> Vec<u32> {
    let index = PoiIndex::new(pois);

    log::debug!(
        "Counting {} indexed POIs within {radius_km} km of {} grid cells",
        index.len(),
        cells.len()
    );

    cells
        .iter()
        .map(|cell| {
            cell.centroid.map_or(0, |centroid| {
                u32::try_from(index.count_within(centroid, radius_km)).unwrap_or(u32::MAX)
            })
        })
        .collect()
}

/// Finds the grid cell whose centroid is closest to `point`.
///
/// Cells without a centroid are ignored. On equal distances the earlier
/// cell wins. Returns `None` when no cell has a centroid.
#[must_use]
pub fn nearest_cell(cells: &[GridCell], point: Coordinates) -> Option<(&GridCell, f64)> {
    let mut best: Option<(&GridCell, f64)> = None;

    for cell in cells {
        let Some(centroid) = cell.centroid else {
            continue;
        };
        let distance = haversine_km(point, centroid);

        match best {
            Some((_, current)) if distance >= current => {}
            _ => best = Some((cell, distance)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use locate_ncr_grid_models::PoiCategory;

    fn at(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    fn atm(id: i64, lat: f64, lng: f64) -> PoiRecord {
        PoiRecord::new(id, PoiCategory::Atm, Some(at(lat, lng)))
    }

    #[test]
    fn counts_pois_per_cell() {
        let cells = vec![
            GridCell::new(1, 5, 1.0).with_centroid(at(28.60, 77.20)),
            GridCell::new(2, 5, 1.0).with_centroid(at(28.70, 77.20)),
            GridCell::new(3, 5, 1.0),
        ];
        let pois = vec![
            atm(1, 28.601, 77.20),
            atm(2, 28.605, 77.201),
            atm(3, 28.70, 77.20),
            PoiRecord::new(4, PoiCategory::Atm, None),
        ];

        assert_eq!(competitor_counts(&cells, &pois, 2.0), vec![2, 1, 0]);
    }

    #[test]
    fn empty_poi_set_gives_zero_counts() {
        let cells = vec![GridCell::new(1, 5, 1.0).with_centroid(at(28.6, 77.2))];
        assert_eq!(competitor_counts(&cells, &[], 2.0), vec![0]);
    }

    #[test]
    fn radius_is_inclusive() {
        let center = at(0.0, 0.0);
        let poi = atm(1, 1.0, 0.0);
        let exact = haversine_km(center, at(1.0, 0.0));
        assert_eq!(count_within_radius(center, &[poi], exact), 1);
    }

    #[test]
    fn nearest_cell_skips_missing_centroids() {
        let cells = vec![
            GridCell::new(1, 0, 1.0),
            GridCell::new(2, 0, 1.0).with_centroid(at(28.9, 77.2)),
            GridCell::new(3, 0, 1.0).with_centroid(at(28.61, 77.2)),
        ];

        let (cell, distance) = nearest_cell(&cells, at(28.6, 77.2)).unwrap();

        assert_eq!(cell.id, 3);
        assert!((distance - 1.112).abs() < 0.01);
    }

    #[test]
    fn nearest_cell_tie_keeps_first() {
        let cells = vec![
            GridCell::new(1, 0, 1.0).with_centroid(at(28.61, 77.2)),
            GridCell::new(2, 0, 1.0).with_centroid(at(28.61, 77.2)),
        ];
        assert_eq!(nearest_cell(&cells, at(28.6, 77.2)).unwrap().0.id, 1);
    }

    #[test]
    fn nearest_cell_none_without_centroids() {
        let cells = vec![GridCell::new(1, 0, 1.0)];
        assert!(nearest_cell(&cells, at(28.6, 77.2)).is_none());
    }
}
