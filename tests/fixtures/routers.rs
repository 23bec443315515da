//! Scripted route providers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use waypoint_router::coords::Waypoint;
use waypoint_router::error::{RouteError, RouteResult};
use waypoint_router::polyline::Polyline;
use waypoint_router::traits::{OptimizedTrip, RouteProvider};

/// A trip straight through `waypoints` in the given order.
pub fn trip_through(waypoints: &[Waypoint]) -> OptimizedTrip {
    OptimizedTrip {
        geometry: Polyline::new(waypoints.iter().map(Waypoint::position).collect()),
        distance: 1000.0 * waypoints.len() as f64,
        duration: 60.0 * waypoints.len() as f64,
        waypoint_order: (0..waypoints.len()).collect(),
    }
}

/// Answers immediately; fails with HTTP 500 while `failing` is set.
#[derive(Default)]
pub struct EchoRouter {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl EchoRouter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RouteProvider for EchoRouter {
    async fn optimized_trip(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RouteError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(trip_through(waypoints))
    }
}

type PendingReply = (Vec<Waypoint>, oneshot::Sender<RouteResult<OptimizedTrip>>);

/// Holds every request until the test answers it.
#[derive(Default)]
pub struct GatedRouter {
    pending: Mutex<Vec<Option<PendingReply>>>,
}

impl GatedRouter {
    /// Waits until `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.pending.lock().await.len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("requests did not arrive");
    }

    pub async fn waypoints_of(&self, request: usize) -> Vec<Waypoint> {
        let pending = self.pending.lock().await;
        pending[request]
            .as_ref()
            .map(|(waypoints, _)| waypoints.clone())
            .expect("request already answered")
    }

    /// Answers request `request` (0-based, arrival order).
    pub async fn answer(&self, request: usize, reply: RouteResult<OptimizedTrip>) {
        let (_, tx) = self.pending.lock().await[request]
            .take()
            .expect("request already answered");
        let _ = tx.send(reply);
    }

    /// Answers request `request` with a trip through its own waypoints.
    pub async fn answer_echo(&self, request: usize) {
        let waypoints = self.waypoints_of(request).await;
        self.answer(request, Ok(trip_through(&waypoints))).await;
    }
}

#[async_trait]
impl RouteProvider for GatedRouter {
    async fn optimized_trip(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.push(Some((waypoints.to_vec(), tx)));
        rx.await.unwrap_or(Err(RouteError::NoRoute))
    }
}
