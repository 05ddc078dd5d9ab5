//! R-tree index over POI coordinates for radius queries.
//!
//! The tree only narrows the candidate set with a bounding box around the
//! search circle; every candidate is then checked with the exact haversine
//! distance, so counts always match a brute-force scan.

use std::f64::consts::FRAC_PI_2;

use locate_ncr_grid_models::{Coordinates, PoiRecord};
use rstar::{AABB, RTree, RTreeObject};

use crate::{EARTH_RADIUS_KM, haversine_km};

/// Padding added to every bounding box, in degrees (~1 cm).
const ENVELOPE_MARGIN_DEG: f64 = 1e-7;

/// A POI position stored in the R-tree, keyed by its slot in the source
/// slice.
struct IndexedPoi {
    slot: usize,
    position: [f64; 2],
}

impl RTreeObject for IndexedPoi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// A POI found inside a search radius.
#[derive(Debug, Clone, Copy)]
pub struct PoiHit<'a> {
    /// The matching POI.
    pub poi: &'a PoiRecord,
    /// Great-circle distance from the search center in kilometers.
    pub distance_km: f64,
}

/// Spatial index over a borrowed POI slice.
///
/// POIs without coordinates are left out entirely. POIs whose coordinates
/// are finite but outside the valid lat/lng range cannot be bounded by an
/// envelope, so they are kept aside and checked on every query.
pub struct PoiIndex<'a> {
    pois: &'a [PoiRecord],
    tree: RTree<IndexedPoi>,
    out_of_range: Vec<usize>,
}

impl<'a> PoiIndex<'a> {
    /// Builds the index with a single bulk load.
    #[must_use]
    pub fn new(pois: &'a [PoiRecord]) -> Self {
        let mut entries = Vec::with_capacity(pois.len());
        let mut out_of_range = Vec::new();
        let mut skipped = 0usize;

        for (slot, poi) in pois.iter().enumerate() {
            match poi.coordinates.filter(Coordinates::is_valid) {
                None => skipped += 1,
                Some(c) if c.lat.abs() > 90.0 || c.lng.abs() > 180.0 => out_of_range.push(slot),
                Some(c) => entries.push(IndexedPoi {
                    slot,
                    position: c.to_lng_lat(),
                }),
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {skipped} POIs without usable coordinates");
        }

        Self {
            pois,
            tree: RTree::bulk_load(entries),
            out_of_range,
        }
    }

    /// Number of POIs with usable coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size() + self.out_of_range.len()
    }

    /// Whether no POI has usable coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every POI within `radius_km` (inclusive) of `center`, in the
    /// order they appear in the source slice.
    #[must_use]
    pub fn within(&self, center: Coordinates, radius_km: f64) -> Vec<PoiHit<'a>> {
        let mut slots = self.candidate_slots(center, radius_km);
        slots.sort_unstable();

        slots
            .into_iter()
            .filter_map(|slot| {
                let poi = &self.pois[slot];
                let distance_km = haversine_km(center, poi.coordinates?);
                (distance_km <= radius_km).then_some(PoiHit { poi, distance_km })
            })
            .collect()
    }

    /// Counts POIs within `radius_km` (inclusive) of `center`.
    #[must_use]
    pub fn count_within(&self, center: Coordinates, radius_km: f64) -> usize {
        self.candidate_slots(center, radius_km)
            .into_iter()
            .filter(|&slot| {
                self.pois[slot]
                    .coordinates
                    .is_some_and(|c| haversine_km(center, c) <= radius_km)
            })
            .count()
    }

    fn candidate_slots(&self, center: Coordinates, radius_km: f64) -> Vec<usize> {
        // No distance can satisfy a NaN or negative radius.
        if !center.is_valid() || radius_km.is_nan() || radius_km < 0.0 {
            return Vec::new();
        }

        let mut slots = self.out_of_range.clone();
        match search_envelope(center, radius_km) {
            Some(envelope) => slots.extend(
                self.tree
                    .locate_in_envelope_intersecting(&envelope)
                    .map(|e| e.slot),
            ),
            None => slots.extend(self.tree.iter().map(|e| e.slot)),
        }
        slots
    }
}

/// Computes a lng/lat box that contains the whole spherical cap of
/// `radius_km` around `center`.
///
/// Returns `None` when the cap cannot be bounded by a single box (it
/// touches a pole, crosses the antimeridian, or covers a hemisphere), in
/// which case the caller falls back to checking every entry.
fn search_envelope(center: Coordinates, radius_km: f64) -> Option<AABB<[f64; 2]>> {
    let angular = radius_km / EARTH_RADIUS_KM;
    if !angular.is_finite() || angular >= FRAC_PI_2 || center.lat.abs() > 90.0 {
        return None;
    }

    let dlat = angular.to_degrees() + ENVELOPE_MARGIN_DEG;
    let min_lat = center.lat - dlat;
    let max_lat = center.lat + dlat;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    let dlng = (angular.sin() / center.lat.to_radians().cos())
        .min(1.0)
        .asin()
        .to_degrees()
        + ENVELOPE_MARGIN_DEG;
    let min_lng = center.lng - dlng;
    let max_lng = center.lng + dlng;
    if min_lng < -180.0 || max_lng > 180.0 {
        return None;
    }

    Some(AABB::from_corners([min_lng, min_lat], [max_lng, max_lat]))
}
