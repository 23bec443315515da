//! Waypoints and coordinate axis conversion.
//!
//! Internally every position is a `(latitude, longitude)` tuple. The trip
//! service and GeoJSON both want `(longitude, latitude)`, so conversion
//! happens at those two boundaries and nowhere else.

use serde::{Deserialize, Serialize};

/// A user-placed point used as routing input.
///
/// `id` is the feature id assigned by the drawing widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }

    /// Position as (lat, lng).
    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Swaps the two axes of a coordinate pair.
pub fn swap_axes((a, b): (f64, f64)) -> (f64, f64) {
    (b, a)
}

/// Converts (lat, lng) positions to the (lng, lat) order the trip service expects.
pub fn to_service_order(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points.iter().copied().map(swap_axes).collect()
}

/// Converts (lng, lat) positions back to internal (lat, lng) order.
///
/// The same swap is used for the GeoJSON render layer in the other direction.
pub fn to_render_order(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points.iter().copied().map(swap_axes).collect()
}
