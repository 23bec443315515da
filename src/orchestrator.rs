//! Route orchestrator: waypoint events in, route layer out.
//!
//! The orchestrator reads the full waypoint set from the drawing widget on
//! every point-added event, requests an optimized trip once two or more
//! points exist, and replaces the single route layer with the response.
//! Each request takes a sequence number; a response is applied only if no
//! later request (or reset) happened while it was in flight.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::coords::Waypoint;
use crate::error::{RouteError, RouteResult};
use crate::geojson::{Feature, LineLayer, LineStyle};
use crate::polyline::Polyline;
use crate::traits::{
    Control, ControlEvent, ControlPanel, DrawEvent, DrawingWidget, MapSurface, Notice,
    OptimizedTrip, RouteProvider,
};

/// Layer id used for the route line.
pub const ROUTE_LAYER_ID: &str = "route";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayState {
    #[default]
    Idle,
    Routed,
}

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub layer_id: String,
    pub style: LineStyle,
    /// Hide the "add point" control while a route is shown.
    pub hide_add_point_when_routed: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            layer_id: ROUTE_LAYER_ID.to_string(),
            style: LineStyle::default(),
            hide_add_point_when_routed: false,
        }
    }
}

#[derive(Debug, Default)]
struct RouteState {
    mode: DisplayState,
    latest_request: u64,
    route: Option<OptimizedTrip>,
}

pub struct RouteOrchestrator {
    drawing: Arc<dyn DrawingWidget>,
    map: Arc<dyn MapSurface>,
    controls: Arc<dyn ControlPanel>,
    router: Arc<dyn RouteProvider>,
    options: OrchestratorOptions,
    state: Mutex<RouteState>,
    /// Serializes collaborator updates. `state` is only locked briefly and
    /// never while collaborators run, so hosts may call the read accessors
    /// from their callbacks.
    ui: Mutex<()>,
}

impl RouteOrchestrator {
    /// Builds an orchestrator and puts the controls in their initial state.
    pub fn new(
        drawing: Arc<dyn DrawingWidget>,
        map: Arc<dyn MapSurface>,
        controls: Arc<dyn ControlPanel>,
        router: Arc<dyn RouteProvider>,
        options: OrchestratorOptions,
    ) -> Self {
        let orchestrator = Self {
            drawing,
            map,
            controls,
            router,
            options,
            state: Mutex::new(RouteState::default()),
            ui: Mutex::new(()),
        };
        orchestrator.show_controls(DisplayState::Idle, false);
        orchestrator
    }

    /// Builds an orchestrator, subscribes to widget and control events and
    /// spawns the event loop.
    pub fn start(
        drawing: Arc<dyn DrawingWidget>,
        map: Arc<dyn MapSurface>,
        controls: Arc<dyn ControlPanel>,
        router: Arc<dyn RouteProvider>,
        options: OrchestratorOptions,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let orchestrator = Arc::new(Self::new(drawing, map, controls, router, options));
        let handle = Arc::clone(&orchestrator).spawn();
        (orchestrator, handle)
    }

    /// Subscribes now and runs the event loop on a new task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let draw_events = self.drawing.subscribe();
        let control_events = self.controls.subscribe();
        tokio::spawn(self.run(draw_events, control_events))
    }

    /// Dispatches widget and control events until both streams close.
    ///
    /// Point-created events are handled on their own task so a pending trip
    /// request never holds up later events.
    pub async fn run(
        self: Arc<Self>,
        mut draw_events: broadcast::Receiver<DrawEvent>,
        mut control_events: broadcast::Receiver<ControlEvent>,
    ) {
        let mut draw_open = true;
        let mut controls_open = true;

        while draw_open || controls_open {
            tokio::select! {
                event = draw_events.recv(), if draw_open => match event {
                    Ok(DrawEvent::Created(waypoint)) => {
                        debug!(id = %waypoint.id, lat = waypoint.lat, lng = waypoint.lng, "point created");
                        self.spawn_point_added();
                    }
                    Ok(DrawEvent::Deleted(ids)) => self.on_points_deleted(&ids),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "draw events lagged, routing the current point set");
                        self.spawn_point_added();
                    }
                    Err(RecvError::Closed) => draw_open = false,
                },
                event = control_events.recv(), if controls_open => match event {
                    Ok(ControlEvent::ResetClicked) => self.reset(),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "control events lagged"),
                    Err(RecvError::Closed) => controls_open = false,
                },
            }
        }

        debug!("orchestrator event loop stopped");
    }

    fn spawn_point_added(self: &Arc<Self>) {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            let _ = orchestrator.on_point_added().await;
        });
    }

    /// Handles a finalized point: routes the full current point set once it
    /// has at least two points.
    ///
    /// The sequence number is taken before the widget is read, so a reset
    /// that lands while the points are read marks this request stale.
    /// Remote failures are shown as a notice and leave the displayed route
    /// alone. `InsufficientWaypoints` and `StaleResponse` are returned but
    /// never shown.
    pub async fn on_point_added(&self) -> RouteResult<OptimizedTrip> {
        let sequence = {
            let mut state = self.state.lock();
            state.latest_request += 1;
            state.latest_request
        };
        let waypoints = self.drawing.points();

        {
            let _ui = self.ui.lock();
            self.ensure_latest(sequence)?;
            if !waypoints.is_empty() {
                self.controls.set_visible(Control::Reset, true);
            }
            if waypoints.len() < 2 {
                return Err(RouteError::InsufficientWaypoints {
                    count: waypoints.len(),
                });
            }
            self.state.lock().mode = DisplayState::Routed;
            self.show_controls(DisplayState::Routed, true);
        }

        let result = self.request_route(&waypoints).await;

        let _ui = self.ui.lock();
        self.ensure_latest(sequence)?;
        match result {
            Ok(trip) => {
                self.state.lock().route = Some(trip.clone());
                self.render_route(&trip.geometry);
                info!(
                    sequence,
                    waypoints = waypoints.len(),
                    distance = trip.distance,
                    duration = trip.duration,
                    "route updated"
                );
                Ok(trip)
            }
            Err(err) => {
                warn!(sequence, error = %err, "trip request failed");
                if err.is_user_visible() {
                    self.controls
                        .show_notice(Notice::error(format!("Could not update the route: {err}")));
                }
                Err(err)
            }
        }
    }

    fn ensure_latest(&self, sequence: u64) -> RouteResult<()> {
        let latest = self.state.lock().latest_request;
        if sequence != latest {
            debug!(sequence, latest, "discarding stale trip request");
            return Err(RouteError::StaleResponse { sequence, latest });
        }
        Ok(())
    }

    /// Requests an optimized trip over `waypoints` in placement order.
    pub async fn request_route(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip> {
        if waypoints.len() < 2 {
            return Err(RouteError::InsufficientWaypoints {
                count: waypoints.len(),
            });
        }
        self.router.optimized_trip(waypoints).await
    }

    /// Replaces the route layer with one drawn from `geometry`.
    pub fn render_route(&self, geometry: &Polyline) {
        let id = &self.options.layer_id;
        if self.map.has_layer(id) {
            self.map.remove_layer(id);
        }
        self.map.add_line_layer(LineLayer {
            id: id.clone(),
            source: Feature::line_from(geometry),
            style: self.options.style.clone(),
        });
    }

    /// Clears points and route, drops any in-flight response, restores the
    /// initial controls.
    pub fn reset(&self) {
        let _ui = self.ui.lock();
        {
            let mut state = self.state.lock();
            state.latest_request += 1;
            state.mode = DisplayState::Idle;
            state.route = None;
        }

        self.drawing.delete_all();
        if self.map.has_layer(&self.options.layer_id) {
            self.map.remove_layer(&self.options.layer_id);
        }
        self.show_controls(DisplayState::Idle, false);

        info!("map reset");
    }

    /// Point deletion is not routed; the user resets to start over.
    pub fn on_points_deleted(&self, ids: &[String]) {
        info!(?ids, "points deleted; route left unchanged until reset");
    }

    pub fn display_state(&self) -> DisplayState {
        self.state.lock().mode
    }

    pub fn current_route(&self) -> Option<OptimizedTrip> {
        self.state.lock().route.clone()
    }

    fn show_controls(&self, mode: DisplayState, has_points: bool) {
        let add_point = match mode {
            DisplayState::Idle => true,
            DisplayState::Routed => !self.options.hide_add_point_when_routed,
        };
        self.controls.set_visible(Control::AddPoint, add_point);
        self.controls.set_visible(Control::Reset, has_points);
    }
}
