//! Route records and the create/update pipeline.
//!
//! Raw points go through range checks, thinning and encoding here before
//! anything is handed to a [`RouteStore`]. Expected problems (blank names,
//! bad coordinates, too few points) come back as `Err`, never panics.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GeometryError;
use crate::haversine::route_distance;
use crate::map_matching::{MatchError, MatchedRoute, TravelProfile};
use crate::polyline::{Coordinate, Polyline};
use crate::simplify::{simplify_route, DEFAULT_TOLERANCE};
use crate::store::StoreError;
use crate::traits::{RoadMatcher, RouteStore};
use crate::waypoints::{check_coordinates, decode_waypoints, encode_for_storage, COORDINATE_SEPARATOR};

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route: {0}")]
    Validation(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Matching(#[from] MatchError),

    #[error("route not found: {0}")]
    NotFound(String),

    #[error("route store error: {0}")]
    Store(String),
}

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RouteError::NotFound(id),
            StoreError::Backend(msg) => RouteError::Store(msg),
        }
    }
}

/// User-entered fields for a new route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDraft {
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl RouteDraft {
    /// New routes start active.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            active: true,
        }
    }

    fn validated(self) -> Result<Self, RouteError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            description: validate_description(&self.description)?,
            active: self.active,
        })
    }
}

/// A route ready to be stored, without an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRouteRecord {
    pub name: String,
    pub description: String,
    pub active: bool,
    /// Waypoints string, see [`crate::waypoints`].
    pub waypoints: String,
    pub distance_m: f64,
    /// Unix seconds.
    pub created_at: i64,
}

impl NewRouteRecord {
    /// Attaches the store-assigned id and creation sequence.
    pub fn with_id(self, id: String, seq: u64) -> RouteRecord {
        RouteRecord {
            id,
            seq,
            name: self.name,
            description: self.description,
            active: self.active,
            waypoints: self.waypoints,
            distance_m: self.distance_m,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: String,
    /// Insertion order within the store. Breaks `created_at` ties.
    pub seq: u64,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub waypoints: String,
    pub distance_m: f64,
    pub created_at: i64,
}

impl RouteRecord {
    /// Number of stored points. Counts tokens without decoding them.
    pub fn waypoint_count(&self) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            self.waypoints.split(COORDINATE_SEPARATOR).count()
        }
    }

    /// Decodes the stored geometry.
    pub fn geometry(&self) -> Result<Polyline, GeometryError> {
        decode_waypoints(&self.waypoints)
    }
}

/// Fields to change on an existing route. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct RouteUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points: Option<Vec<Coordinate>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteOptions {
    /// Thinning tolerance in degrees. `None` stores points as given.
    pub tolerance: Option<f64>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            tolerance: Some(DEFAULT_TOLERANCE),
        }
    }
}

/// Geometry in its stored form.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGeometry {
    pub waypoints: String,
    pub point_count: usize,
    pub distance_m: f64,
}

/// Range-checks, thins and encodes a raw path.
///
/// A bad coordinate rejects the whole path; nothing is filtered out.
pub fn prepare_geometry(
    points: &[Coordinate],
    options: &RouteOptions,
) -> Result<PreparedGeometry, RouteError> {
    check_coordinates(points)?;

    let thinned = match options.tolerance {
        Some(tolerance) => simplify_route(points, tolerance),
        None => points.to_vec(),
    };
    let waypoints = encode_for_storage(&thinned)?;

    debug!(
        input = points.len(),
        kept = thinned.len(),
        "prepared route geometry"
    );

    Ok(PreparedGeometry {
        waypoints,
        point_count: thinned.len(),
        distance_m: route_distance(&thinned),
    })
}

pub fn create_route<S: RouteStore + ?Sized>(
    store: &S,
    draft: RouteDraft,
    points: &[Coordinate],
    options: &RouteOptions,
) -> Result<RouteRecord, RouteError> {
    let draft = draft.validated()?;
    let geometry = prepare_geometry(points, options)?;

    let record = store.insert(NewRouteRecord {
        name: draft.name,
        description: draft.description,
        active: draft.active,
        waypoints: geometry.waypoints,
        distance_m: geometry.distance_m,
        created_at: unix_now(),
    })?;

    info!(
        id = %record.id,
        points = geometry.point_count,
        distance_m = record.distance_m,
        "route created"
    );
    Ok(record)
}

/// Snaps `points` to roads, then stores the matched geometry.
///
/// The draft is validated before the matcher is called.
pub fn create_matched_route<S, M>(
    store: &S,
    matcher: &M,
    draft: RouteDraft,
    points: &[Coordinate],
    profile: TravelProfile,
    options: &RouteOptions,
) -> Result<(RouteRecord, MatchedRoute), RouteError>
where
    S: RouteStore + ?Sized,
    M: RoadMatcher + ?Sized,
{
    let draft = draft.validated()?;
    let matched = matcher.match_route(points, profile)?;
    debug!(
        confidence = matched.confidence,
        matched_points = matched.coordinates.len(),
        "route matched to roads"
    );
    let record = create_route(store, draft, matched.coordinates.points(), options)?;
    Ok((record, matched))
}

pub fn update_route<S: RouteStore + ?Sized>(
    store: &S,
    id: &str,
    update: RouteUpdate,
    options: &RouteOptions,
) -> Result<RouteRecord, RouteError> {
    let mut record = store.get(id)?;

    if let Some(name) = update.name {
        record.name = validate_name(&name)?;
    }
    if let Some(description) = update.description {
        record.description = validate_description(&description)?;
    }
    if let Some(points) = update.points {
        let geometry = prepare_geometry(&points, options)?;
        record.waypoints = geometry.waypoints;
        record.distance_m = geometry.distance_m;
    }

    let record = store.update(record)?;
    info!(id = %record.id, "route updated");
    Ok(record)
}

pub fn set_active<S: RouteStore + ?Sized>(
    store: &S,
    id: &str,
    active: bool,
) -> Result<RouteRecord, RouteError> {
    let mut record = store.get(id)?;
    record.active = active;
    let record = store.update(record)?;
    info!(id = %record.id, active, "route activation changed");
    Ok(record)
}

pub fn delete_route<S: RouteStore + ?Sized>(store: &S, id: &str) -> Result<(), RouteError> {
    store.delete(id)?;
    info!(id, "route deleted");
    Ok(())
}

/// All routes, newest first.
pub fn list_routes<S: RouteStore + ?Sized>(store: &S) -> Result<Vec<RouteRecord>, RouteError> {
    let mut records = store.list()?;
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });
    Ok(records)
}

/// Decodes a stored record's geometry.
pub fn load_geometry(record: &RouteRecord) -> Result<Polyline, RouteError> {
    Ok(record.geometry()?)
}

fn validate_name(raw: &str) -> Result<String, RouteError> {
    validate_text("name", raw, MAX_NAME_CHARS)
}

fn validate_description(raw: &str) -> Result<String, RouteError> {
    validate_text("description", raw, MAX_DESCRIPTION_CHARS)
}

/// Limits count Unicode scalar values, so an emoji counts once (a browser
/// `maxLength` would count it twice).
fn validate_text(field: &str, raw: &str, max_chars: usize) -> Result<String, RouteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RouteError::Validation(format!("{field} is required")));
    }
    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(RouteError::Validation(format!(
            "{field} is {chars} characters, maximum is {max_chars}"
        )));
    }
    Ok(trimmed.to_string())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
