//! Waypoints string encoding and coordinate range checks.
//!
//! Routes are persisted as `"lon,lat;lon,lat;..."`. Numbers are written with
//! `f64`'s shortest round-trip rendering, so decoding an encoded polyline
//! gives back the exact same values.

use crate::error::GeometryError;
use crate::polyline::{Coordinate, Polyline};

/// Separator between coordinates.
pub const COORDINATE_SEPARATOR: &str = ";";

/// Separator between longitude and latitude.
pub const COMPONENT_SEPARATOR: &str = ",";

/// Fewest points a persisted route may have.
pub const MIN_ROUTE_POINTS: usize = 2;

/// True iff every coordinate is within longitude/latitude bounds.
pub fn validate_coordinates(points: &[Coordinate]) -> bool {
    points.iter().all(Coordinate::in_range)
}

/// Like [`validate_coordinates`], but reports the first offending point.
pub fn check_coordinates(points: &[Coordinate]) -> Result<(), GeometryError> {
    match points.iter().position(|p| !p.in_range()) {
        Some(index) => Err(GeometryError::Range {
            index,
            lon: points[index].lon,
            lat: points[index].lat,
        }),
        None => Ok(()),
    }
}

/// Encodes points as a Waypoints string, preserving order.
///
/// Performs no validation; use [`encode_for_storage`] before persisting.
pub fn encode_waypoints(points: &[Coordinate]) -> String {
    points
        .iter()
        .map(|p| format!("{}{}{}", p.lon, COMPONENT_SEPARATOR, p.lat))
        .collect::<Vec<_>>()
        .join(COORDINATE_SEPARATOR)
}

/// Encodes points for persistence: at least two points, all in range.
pub fn encode_for_storage(points: &[Coordinate]) -> Result<String, GeometryError> {
    if points.len() < MIN_ROUTE_POINTS {
        return Err(GeometryError::InputSize {
            min: MIN_ROUTE_POINTS,
            max: None,
            actual: points.len(),
        });
    }
    check_coordinates(points)?;
    Ok(encode_waypoints(points))
}

/// Decodes a Waypoints string.
///
/// The empty string is an empty polyline. Any token that is not exactly two
/// finite numbers fails the whole decode. Range is not checked here.
pub fn decode_waypoints(encoded: &str) -> Result<Polyline, GeometryError> {
    if encoded.is_empty() {
        return Ok(Polyline::default());
    }

    encoded
        .split(COORDINATE_SEPARATOR)
        .enumerate()
        .map(|(index, token)| decode_token(index, token))
        .collect()
}

fn decode_token(index: usize, token: &str) -> Result<Coordinate, GeometryError> {
    let format_error = |reason: String| GeometryError::Format {
        index,
        token: token.to_string(),
        reason,
    };

    let mut parts = token.split(COMPONENT_SEPARATOR);
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format_error(
            "expected exactly two comma-separated numbers".to_string(),
        ));
    };

    let lon = parse_component(lon).map_err(|reason| format_error(format!("longitude {reason}")))?;
    let lat = parse_component(lat).map_err(|reason| format_error(format!("latitude {reason}")))?;
    Ok(Coordinate::new(lon, lat))
}

fn parse_component(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("{trimmed:?} is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{trimmed:?} is not finite"))
    }
}
