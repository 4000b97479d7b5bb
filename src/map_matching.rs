//! Map-matching HTTP adapter.
//!
//! Speaks the Mapbox Matching v5 API. A self-hosted OSRM `match/v1` service
//! returns the same response shape and can be used through
//! [`MapMatchingConfig::osrm`].

use std::env;
use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GeometryError;
use crate::polyline::{Coordinate, Polyline};
use crate::traits::RoadMatcher;
use crate::waypoints::{check_coordinates, encode_waypoints};

/// Fewest points the API will match.
pub const MIN_MATCH_POINTS: usize = 2;

/// Most points the API accepts in one request.
pub const MAX_MATCH_POINTS: usize = 100;

/// Travel mode used to pick the road network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
    DrivingTraffic,
}

impl TravelProfile {
    pub const ALL: [TravelProfile; 4] = [
        TravelProfile::Driving,
        TravelProfile::Walking,
        TravelProfile::Cycling,
        TravelProfile::DrivingTraffic,
    ];

    /// Path segment used in request URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
            TravelProfile::DrivingTraffic => "driving-traffic",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel profile: {0:?}")]
pub struct UnknownProfile(pub String);

impl FromStr for TravelProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str() == s)
            .ok_or_else(|| UnknownProfile(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct MapMatchingConfig {
    pub base_url: String,
    /// Path between the host and the profile, e.g. `matching/v5/mapbox`.
    pub api_path: String,
    pub access_token: Option<String>,
    pub profile: TravelProfile,
    pub timeout_secs: u64,
}

impl Default for MapMatchingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            api_path: "matching/v5/mapbox".to_string(),
            access_token: None,
            profile: TravelProfile::Driving,
            timeout_secs: 10,
        }
    }
}

impl MapMatchingConfig {
    /// Config for a self-hosted OSRM backend. No access token.
    pub fn osrm(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: "match/v1".to_string(),
            ..Self::default()
        }
    }

    /// Load from the environment, reading a `.env` file first if present.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("MAP_MATCHING_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(api_path) = lookup("MAP_MATCHING_API_PATH") {
            config.api_path = api_path.trim_matches('/').to_string();
        }
        config.access_token = lookup("MAPBOX_ACCESS_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        if let Some(profile) = lookup("MAP_MATCHING_PROFILE") {
            config.profile = profile.parse().map_err(|_| ConfigError::Invalid {
                key: "MAP_MATCHING_PROFILE",
                value: profile,
            })?;
        }
        if let Some(timeout) = lookup("MAP_MATCHING_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| ConfigError::Invalid {
                key: "MAP_MATCHING_TIMEOUT_SECS",
                value: timeout,
            })?;
        }

        Ok(config)
    }
}

/// A route snapped onto the road network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRoute {
    pub coordinates: Polyline,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    /// How well the snapped geometry fits the input, 0 to 1.
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("map matching request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("map matching API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("route could not be matched to roads (code {code})")]
    NoMatch { code: String },

    #[error("invalid map matching response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct MapMatchingClient {
    config: MapMatchingConfig,
    client: reqwest::blocking::Client,
}

impl MapMatchingClient {
    pub fn new(config: MapMatchingConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &MapMatchingConfig {
        &self.config
    }

    /// Match with the configured default profile.
    pub fn match_default(&self, points: &[Coordinate]) -> Result<MatchedRoute, MatchError> {
        self.match_route(points, self.config.profile)
    }

    fn request_url(&self, points: &[Coordinate], profile: TravelProfile) -> String {
        let mut url = format!(
            "{}/{}/{}/{}?geometries=geojson&overview=full&steps=false&tidy=false",
            self.config.base_url,
            self.config.api_path,
            profile,
            encode_waypoints(points)
        );
        if let Some(token) = &self.config.access_token {
            url.push_str("&access_token=");
            url.push_str(token);
        }
        url
    }
}

impl RoadMatcher for MapMatchingClient {
    fn match_route(
        &self,
        points: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<MatchedRoute, MatchError> {
        if !(MIN_MATCH_POINTS..=MAX_MATCH_POINTS).contains(&points.len()) {
            return Err(GeometryError::InputSize {
                min: MIN_MATCH_POINTS,
                max: Some(MAX_MATCH_POINTS),
                actual: points.len(),
            }
            .into());
        }
        check_coordinates(points)?;

        debug!(
            base_url = %self.config.base_url,
            %profile,
            points = points.len(),
            "requesting map match"
        );

        let response = self
            .client
            .get(self.request_url(points, profile))
            .send()
            .and_then(|resp| {
                let status = resp.status();
                resp.text().map(|body| (status, body))
            });

        let (status, body) = match response {
            Ok(parts) => parts,
            Err(err) => {
                // The URL carries the access token.
                let err = err.without_url();
                warn!(error = %err, "map matching request failed");
                return Err(err.into());
            }
        };

        let matched = interpret_response(status, &body);
        match &matched {
            Ok(route) => debug!(
                points = route.coordinates.len(),
                distance = route.distance,
                confidence = route.confidence,
                "map match succeeded"
            ),
            Err(err) => warn!(status = status.as_u16(), error = %err, "map match failed"),
        }
        matched
    }
}

fn interpret_response(status: StatusCode, body: &str) -> Result<MatchedRoute, MatchError> {
    if !status.is_success() {
        let parsed = serde_json::from_str::<MatchingResponse>(body).ok();
        if let Some(MatchingResponse { code, .. }) = &parsed {
            if code == NO_MATCH_CODE {
                return Err(MatchError::NoMatch { code: code.clone() });
            }
        }
        let message = parsed
            .and_then(|resp| resp.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        return Err(MatchError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: MatchingResponse = serde_json::from_str(body)?;
    if response.code != OK_CODE {
        return Err(MatchError::NoMatch {
            code: response.code,
        });
    }

    let code = response.code;
    response
        .matchings
        .into_iter()
        .next()
        .map(|best| MatchedRoute {
            coordinates: best.geometry.coordinates,
            distance: best.distance,
            duration: best.duration,
            confidence: best.confidence,
        })
        .ok_or(MatchError::NoMatch { code })
}

const OK_CODE: &str = "Ok";
const NO_MATCH_CODE: &str = "NoMatch";

#[derive(Debug, Deserialize)]
struct MatchingResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    matchings: Vec<Matching>,
}

#[derive(Debug, Deserialize)]
struct Matching {
    geometry: MatchingGeometry,
    distance: f64,
    duration: f64,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct MatchingGeometry {
    coordinates: Polyline,
}
