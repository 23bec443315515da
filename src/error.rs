//! Errors raised while requesting and applying routes.

use thiserror::Error;

use crate::polyline::PolylineError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("trip request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trip service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("trip service rejected the request ({code}): {message}")]
    Service { code: String, message: String },
    #[error("trip service returned no route")]
    NoRoute,
    #[error("route geometry could not be decoded: {0}")]
    Geometry(#[from] PolylineError),
    #[error("{count} waypoints exceed the service limit of {max}")]
    TooManyWaypoints { count: usize, max: usize },
    #[error("at least 2 waypoints are needed for a route, have {count}")]
    InsufficientWaypoints { count: usize },
    #[error("response for request {sequence} superseded by request {latest}")]
    StaleResponse { sequence: u64, latest: u64 },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RouteError {
    /// Whether the failure should be shown to the user.
    ///
    /// The waypoint guard and stale responses are expected outcomes, not failures.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            RouteError::InsufficientWaypoints { .. } | RouteError::StaleResponse { .. }
        )
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
