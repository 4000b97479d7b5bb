//! route-geometry core
//!
//! Geometry processing for drawn and road-snapped transit routes, plus the
//! seams to the map-matching API and the route document store.

pub mod error;
pub mod polyline;
pub mod haversine;
pub mod simplify;
pub mod waypoints;
pub mod traits;
pub mod map_matching;
pub mod routes;
pub mod store;

pub use error::GeometryError;
pub use polyline::{Coordinate, Polyline};
