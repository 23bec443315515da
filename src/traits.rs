//! Collaborator interfaces for the route orchestrator.
//!
//! The drawing widget, the map surface, the UI controls and the routing
//! service are external. Hosts implement these traits for their own UI
//! toolkit; `crate::memory` has headless versions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::coords::Waypoint;
use crate::error::RouteResult;
use crate::geojson::LineLayer;
use crate::polyline::Polyline;

/// Events emitted by the point-drawing widget.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// The user finalized a new point.
    Created(Waypoint),
    /// One or more points were removed, by feature id.
    Deleted(Vec<String>),
}

/// Events emitted by the UI controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    ResetClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    AddPoint,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-fatal message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The point-drawing widget that stores user-placed waypoints.
pub trait DrawingWidget: Send + Sync {
    /// All current points in placement order.
    fn points(&self) -> Vec<Waypoint>;

    fn delete_all(&self);

    fn subscribe(&self) -> broadcast::Receiver<DrawEvent>;
}

/// The map rendering surface.
pub trait MapSurface: Send + Sync {
    fn has_layer(&self, id: &str) -> bool;

    /// Adds a line layer. Callers remove an existing layer with the same id first.
    fn add_line_layer(&self, layer: LineLayer);

    fn remove_layer(&self, id: &str);
}

/// The "add point" / "reset" controls and the notice area.
pub trait ControlPanel: Send + Sync {
    fn set_visible(&self, control: Control, visible: bool);

    fn show_notice(&self, notice: Notice);

    fn subscribe(&self) -> broadcast::Receiver<ControlEvent>;
}

/// A route returned for a set of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedTrip {
    pub geometry: Polyline,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    /// Position of each input waypoint in the optimized visiting order.
    pub waypoint_order: Vec<usize>,
}

/// Computes an optimized trip with the first waypoint fixed as origin and the
/// last fixed as destination.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn optimized_trip(&self, waypoints: &[Waypoint]) -> RouteResult<OptimizedTrip>;
}
