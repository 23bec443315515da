//! Haversine route provider (fallback when no trip service is reachable).
//!
//! Orders interior waypoints by great-circle nearest neighbour, keeping the
//! first waypoint as origin and the last as destination, and joins them with
//! straight segments. Ignores roads, but needs no network or credential.

use async_trait::async_trait;

use crate::coords::Waypoint;
use crate::error::{RouteError, RouteResult};
use crate::polyline::Polyline;
use crate::traits::{OptimizedTrip, RouteProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two (lat, lng) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Visiting order over indices of `points`: first and last fixed, interior
    /// chosen greedily by nearest neighbour.
    fn visiting_order(points: &[(f64, f64)]) -> Vec<usize> {
        let last = points.len() - 1;
        let mut remaining: Vec<usize> = (1..last).collect();
        let mut order = vec![0];

        while !remaining.is_empty() {
            let current = points[*order.last().unwrap_or(&0)];
            let (slot, _) = remaining
                .iter()
                .enumerate()
                .map(|(slot, &index)| (slot, Self::haversine_km(current, points[index])))
                .fold((0, f64::INFINITY), |best, candidate| {
                    if candidate.1 < best.1 { candidate } else { best }
                });
            order.push(remaining.remove(slot));
        }

        order.push(last);
        order
    }
}

#[async_trait]
impl RouteProvider for HaversineRouter {
    async fn optimized_trip(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip> {
        if waypoints.len() < 2 {
            return Err(RouteError::InsufficientWaypoints {
                count: waypoints.len(),
            });
        }

        let points = waypoints.iter().map(Waypoint::position).collect::<Vec<_>>();
        let order = Self::visiting_order(&points);
        let path = order.iter().map(|&index| points[index]).collect::<Vec<_>>();

        let km: f64 = path
            .windows(2)
            .map(|pair| Self::haversine_km(pair[0], pair[1]))
            .sum();

        let mut waypoint_order = vec![0; order.len()];
        for (position, &index) in order.iter().enumerate() {
            waypoint_order[index] = position;
        }

        Ok(OptimizedTrip {
            geometry: Polyline::new(path),
            distance: km * 1000.0,
            duration: (km / self.speed_kmh * 3600.0).round(),
            waypoint_order,
        })
    }
}
