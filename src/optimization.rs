//! Trip optimization HTTP adapter.
//!
//! Speaks the Mapbox Optimization API v1 and the OSRM `trip` service, which
//! share a request shape and response format.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::coords::{Waypoint, to_render_order, to_service_order};
use crate::error::{RouteError, RouteResult};
use crate::polyline::{PRECISION_5, PRECISION_6, Polyline};
use crate::traits::{OptimizedTrip, RouteProvider};

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";

/// Coordinate limit of the Mapbox Optimization API v1.
pub const MAPBOX_MAX_COORDINATES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    GeoJson,
    Polyline,
    Polyline6,
}

impl GeometryFormat {
    fn as_query(&self) -> &'static str {
        match self {
            GeometryFormat::GeoJson => "geojson",
            GeometryFormat::Polyline => "polyline",
            GeometryFormat::Polyline6 => "polyline6",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationConfig {
    pub base_url: String,
    /// Service path, e.g. `optimized-trips/v1` or `trip/v1`.
    pub service: String,
    pub profile: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub geometries: GeometryFormat,
    pub max_coordinates: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            service: "optimized-trips/v1".to_string(),
            profile: "mapbox/driving".to_string(),
            access_token: None,
            timeout_secs: 10,
            geometries: GeometryFormat::GeoJson,
            max_coordinates: MAPBOX_MAX_COORDINATES,
        }
    }
}

impl OptimizationConfig {
    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    /// A self-hosted `osrm-routed` trip service.
    pub fn osrm(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service: "trip/v1".to_string(),
            profile: "car".to_string(),
            access_token: None,
            max_coordinates: 100,
            ..Self::default()
        }
    }

    /// Mapbox config with the token read from `MAPBOX_ACCESS_TOKEN`.
    pub fn from_env() -> RouteResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> RouteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ACCESS_TOKEN_VAR) {
            Some(token) if !token.trim().is_empty() => Ok(Self::mapbox(token.trim())),
            _ => Err(RouteError::Config(format!("{ACCESS_TOKEN_VAR} is not set"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationClient {
    config: OptimizationConfig,
    client: reqwest::Client,
}

impl OptimizationClient {
    pub fn new(config: OptimizationConfig) -> RouteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    fn trip_url(&self, waypoints: &[Waypoint]) -> String {
        let positions = waypoints.iter().map(Waypoint::position).collect::<Vec<_>>();
        let coords = to_service_order(&positions)
            .into_iter()
            .map(|(lng, lat)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.service,
            self.config.profile,
            coords
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("source", "first".to_string()),
            ("destination", "last".to_string()),
            ("roundtrip", "false".to_string()),
            ("geometries", self.config.geometries.as_query().to_string()),
        ];
        if let Some(token) = &self.config.access_token {
            query.push(("access_token", token.clone()));
        }
        query
    }

    fn decode_geometry(&self, geometry: TripGeometry) -> RouteResult<Polyline> {
        match geometry {
            TripGeometry::LineString { coordinates } => {
                Ok(Polyline::new(to_render_order(&coordinates)))
            }
            TripGeometry::Encoded(encoded) => {
                let precision = match self.config.geometries {
                    GeometryFormat::Polyline6 => PRECISION_6,
                    _ => PRECISION_5,
                };
                Ok(Polyline::decode(&encoded, precision)?)
            }
        }
    }

    fn trip_from(&self, body: TripResponse) -> RouteResult<OptimizedTrip> {
        if body.code != "Ok" {
            return Err(RouteError::Service {
                message: body.message.unwrap_or_else(|| body.code.clone()),
                code: body.code,
            });
        }

        let trip = body.trips.into_iter().next().ok_or(RouteError::NoRoute)?;
        let geometry = self.decode_geometry(trip.geometry)?;
        if geometry.is_empty() {
            return Err(RouteError::NoRoute);
        }

        Ok(OptimizedTrip {
            geometry,
            distance: trip.distance,
            duration: trip.duration,
            waypoint_order: body
                .waypoints
                .into_iter()
                .map(|waypoint| waypoint.waypoint_index)
                .collect(),
        })
    }
}

#[async_trait]
impl RouteProvider for OptimizationClient {
    async fn optimized_trip(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip> {
        if waypoints.len() < 2 {
            return Err(RouteError::InsufficientWaypoints {
                count: waypoints.len(),
            });
        }
        if waypoints.len() > self.config.max_coordinates {
            return Err(RouteError::TooManyWaypoints {
                count: waypoints.len(),
                max: self.config.max_coordinates,
            });
        }

        let url = self.trip_url(waypoints);
        debug!(%url, waypoints = waypoints.len(), "requesting optimized trip");

        let response = self.client.get(url).query(&self.query()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(RouteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<TripResponse>().await?;
        self.trip_from(body)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TripResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    trips: Vec<Trip>,
    #[serde(default)]
    waypoints: Vec<TripWaypoint>,
}

#[derive(Debug, Deserialize)]
struct Trip {
    geometry: TripGeometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TripGeometry {
    Encoded(String),
    /// (lng, lat) coordinates.
    LineString { coordinates: Vec<(f64, f64)> },
}

#[derive(Debug, Deserialize)]
struct TripWaypoint {
    waypoint_index: usize,
}
