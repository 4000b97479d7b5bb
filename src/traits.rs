//! Seams to the external collaborators.
//!
//! The route pipeline takes these as parameters rather than reaching for a
//! shared handle, so tests can swap in doubles.

use crate::map_matching::{MatchError, MatchedRoute, TravelProfile};
use crate::polyline::Coordinate;
use crate::routes::{NewRouteRecord, RouteRecord};
use crate::store::StoreError;

/// Snaps a raw path onto the road network.
pub trait RoadMatcher {
    fn match_route(
        &self,
        points: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<MatchedRoute, MatchError>;
}

/// Persists route records.
///
/// Methods take `&self`; implementations own whatever locking or connection
/// handling they need.
pub trait RouteStore {
    /// Stores a new record and returns it with its assigned id and a `seq`
    /// that increases with every insert.
    fn insert(&self, record: NewRouteRecord) -> Result<RouteRecord, StoreError>;

    fn get(&self, id: &str) -> Result<RouteRecord, StoreError>;

    /// Replaces the record with the same id.
    fn update(&self, record: RouteRecord) -> Result<RouteRecord, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// All records, in no particular order.
    fn list(&self) -> Result<Vec<RouteRecord>, StoreError>;
}
