//! Errors raised by the coordinate adapter.
//!
//! The geometry functions themselves never fail; these cover the checks made
//! before a polyline is persisted or read back from storage.

/// Failure to accept a polyline or a Waypoints string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("coordinate {index} out of range: lon={lon}, lat={lat}")]
    Range { index: usize, lon: f64, lat: f64 },

    #[error("malformed waypoint {index} ({token:?}): {reason}")]
    Format {
        index: usize,
        token: String,
        reason: String,
    },

    #[error("{}", input_size_message(.min, .max, .actual))]
    InputSize {
        min: usize,
        max: Option<usize>,
        actual: usize,
    },
}

fn input_size_message(min: &usize, max: &Option<usize>, actual: &usize) -> String {
    match max {
        Some(max) => format!("expected between {min} and {max} coordinates, got {actual}"),
        None => format!("expected at least {min} coordinates, got {actual}"),
    }
}
