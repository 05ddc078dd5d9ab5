//! Circle rings for drawing catchment areas.

use std::f64::consts::TAU;

use locate_ncr_grid_models::Coordinates;

/// Kilometers per degree of latitude in the flat-earth approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default number of segments in a catchment ring.
pub const DEFAULT_CIRCLE_POINTS: usize = 64;

/// Builds a closed ring of `[lng, lat]` points approximating a circle of
/// `radius_km` around `center`.
///
/// Uses local planar degree offsets (1° latitude ≈ 111 km, 1° longitude ≈
/// 111·cos(lat) km), which is accurate for radii up to a few tens of
/// kilometers away from the poles. The ring has `num_points + 1` points;
/// the last repeats the first.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn create_circle(center: Coordinates, radius_km: f64, num_points: usize) -> Vec<[f64; 2]> {
    let num_points = num_points.max(1);
    let lat_radius = radius_km / KM_PER_DEGREE;
    let lng_radius = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

    (0..=num_points)
        .map(|i| {
            let angle = TAU * i as f64 / num_points as f64;
            [
                lng_radius.mul_add(angle.cos(), center.lng),
                lat_radius.mul_add(angle.sin(), center.lat),
            ]
        })
        .collect()
}
