//! Point thinning for drawn and matched routes.
//!
//! Works on raw degrees as if longitude/latitude were a flat plane. The error
//! grows away from the equator, which is acceptable for dropping redundant
//! vertices from city-scale routes.

use crate::polyline::Coordinate;

/// Default thinning tolerance, in degrees (roughly 11 m of latitude).
pub const DEFAULT_TOLERANCE: f64 = 0.0001;

/// Planar distance from `point` to the segment `start`-`end`.
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearest endpoint. A zero-length segment measures to `start`.
pub fn perpendicular_distance(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let dx = end.lon - start.lon;
    let dy = end.lat - start.lat;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq != 0.0 {
        ((point.lon - start.lon) * dx + (point.lat - start.lat) * dy) / len_sq
    } else {
        -1.0
    };

    let (nearest_lon, nearest_lat) = if t < 0.0 {
        (start.lon, start.lat)
    } else if t > 1.0 {
        (end.lon, end.lat)
    } else {
        (start.lon + t * dx, start.lat + t * dy)
    };

    let ex = point.lon - nearest_lon;
    let ey = point.lat - nearest_lat;
    (ex * ex + ey * ey).sqrt()
}

/// Drops interior points that sit within `tolerance` of the segment joining
/// their original neighbours.
///
/// This is a single pass, not Douglas-Peucker: each point is judged against
/// its immediate input neighbours rather than the simplified chain, so a long
/// gentle curve made of small deviations can be flattened more than a
/// recursive simplifier would. The first and last points are always kept and
/// inputs of two points or fewer come back unchanged.
pub fn simplify_route(points: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut simplified = Vec::with_capacity(points.len());
    simplified.push(points[0]);
    simplified.extend(
        points
            .windows(3)
            .filter(|w| perpendicular_distance(w[1], w[0], w[2]) > tolerance)
            .map(|w| w[1]),
    );
    simplified.push(points[points.len() - 1]);

    simplified
}
