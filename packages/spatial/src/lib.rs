#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial primitives for site recommendation.
//!
//! Provides haversine distance between coordinate pairs, an R-tree backed
//! [`PoiIndex`] for radius queries, per-cell competitor counts, nearest-cell
//! lookup, and the flat-earth circle rings used to draw catchment areas.
//!
//! Missing coordinates are never an error here: they are treated as
//! infinitely far away, so they simply never fall inside a radius.

pub mod circle;
pub mod density;
pub mod index;
pub mod neighbor;

use locate_ncr_grid_models::Coordinates;

pub use circle::create_circle;
pub use density::{competitor_counts, count_within_radius, nearest_cell};
pub use index::PoiIndex;
pub use neighbor::rolling_neighbor_density;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Competitor search radius for basic scoring.
pub const BASIC_COMPETITOR_RADIUS_KM: f64 = 2.0;

/// Competitor search radius for advanced scoring.
pub const ADVANCED_COMPETITOR_RADIUS_KM: f64 = 1.5;

/// Great-circle distance in kilometers between two valid points.
///
/// Returns [`f64::INFINITY`] if either point has a non-finite component.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    if !a.is_valid() || !b.is_valid() {
        return f64::INFINITY;
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = b.lng.to_radians() - a.lng.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push `h` a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Distance between two possibly-missing points.
///
/// A missing point is infinitely far from everything, including another
/// missing point.
#[must_use]
pub fn distance_km(a: Option<Coordinates>, b: Option<Coordinates>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => haversine_km(a, b),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = point(28.6139, 77.2090);
        assert!(haversine_km(p, p).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (point(28.6139, 77.2090), point(28.4595, 77.0266)),
            (point(-33.8688, 151.2093), point(51.5074, -0.1278)),
            (point(0.0, 179.9), point(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "asymmetric: {ab} vs {ba}");
        }
    }

    #[test]
    fn delhi_to_gurgaon() {
        let d = haversine_km(point(28.6139, 77.2090), point(28.4595, 77.0266));
        assert!((d - 24.743).abs() < 0.01, "unexpected distance {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "unexpected distance {d}");
    }

    #[test]
    fn missing_point_is_infinitely_far() {
        let p = Some(point(28.6, 77.2));
        assert!(distance_km(p, None).is_infinite());
        assert!(distance_km(None, p).is_infinite());
        assert!(distance_km(None, None).is_infinite());
    }

    #[test]
    fn invalid_point_is_infinitely_far() {
        let bad = point(f64::NAN, 77.2);
        assert!(haversine_km(bad, point(28.6, 77.2)).is_infinite());
    }
}
