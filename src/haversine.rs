//! Great-circle distances over route geometries.
//!
//! Treats the earth as a sphere. Good to a fraction of a percent, which is
//! plenty for showing route lengths.

use crate::polyline::Coordinate;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
///
/// Arguments are in degrees. Identical points give 0. Non-finite input
/// propagates as NaN.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance between two coordinates, in meters.
pub fn coordinate_distance(from: Coordinate, to: Coordinate) -> f64 {
    haversine_distance(from.lat, from.lon, to.lat, to.lon)
}

/// Total length of a path in meters: the sum over consecutive pairs.
///
/// Paths with fewer than two points have length 0.
pub fn route_distance(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| coordinate_distance(pair[0], pair[1]))
        .sum()
}
