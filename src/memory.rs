//! Headless collaborators backed by in-process state.
//!
//! Useful for tests and for hosts that drive the orchestrator without a real
//! map widget.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::coords::Waypoint;
use crate::geojson::LineLayer;
use crate::traits::{Control, ControlEvent, ControlPanel, DrawEvent, DrawingWidget, MapSurface, Notice};

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct DrawingState {
    next_id: u64,
    points: Vec<Waypoint>,
}

pub struct InMemoryDrawing {
    state: Mutex<DrawingState>,
    events: broadcast::Sender<DrawEvent>,
}

impl Default for InMemoryDrawing {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDrawing {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(DrawingState::default()),
            events,
        }
    }

    /// Places a point and emits `DrawEvent::Created`.
    pub fn add_point(&self, lat: f64, lng: f64) -> Waypoint {
        let waypoint = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let waypoint = Waypoint::new(format!("point-{}", state.next_id), lat, lng);
            state.points.push(waypoint.clone());
            waypoint
        };
        let _ = self.events.send(DrawEvent::Created(waypoint.clone()));
        waypoint
    }

    /// Removes a point by id and emits `DrawEvent::Deleted`.
    pub fn delete_point(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let before = state.points.len();
            state.points.retain(|point| point.id != id);
            state.points.len() != before
        };
        if removed {
            let _ = self.events.send(DrawEvent::Deleted(vec![id.to_string()]));
        }
        removed
    }
}

impl DrawingWidget for InMemoryDrawing {
    fn points(&self) -> Vec<Waypoint> {
        self.state.lock().points.clone()
    }

    fn delete_all(&self) {
        self.state.lock().points.clear();
    }

    fn subscribe(&self) -> broadcast::Receiver<DrawEvent> {
        self.events.subscribe()
    }
}

#[derive(Default)]
pub struct InMemoryMap {
    layers: Mutex<BTreeMap<String, LineLayer>>,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, id: &str) -> Option<LineLayer> {
        self.layers.lock().get(id).cloned()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.lock().len()
    }
}

impl MapSurface for InMemoryMap {
    fn has_layer(&self, id: &str) -> bool {
        self.layers.lock().contains_key(id)
    }

    fn add_line_layer(&self, layer: LineLayer) {
        self.layers.lock().insert(layer.id.clone(), layer);
    }

    fn remove_layer(&self, id: &str) {
        self.layers.lock().remove(id);
    }
}

pub struct InMemoryControls {
    visibility: Mutex<HashMap<Control, bool>>,
    notices: Mutex<Vec<Notice>>,
    events: broadcast::Sender<ControlEvent>,
}

impl Default for InMemoryControls {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryControls {
    /// Starts in the initial page state: "add point" shown, "reset" hidden.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let visibility = HashMap::from([(Control::AddPoint, true), (Control::Reset, false)]);
        Self {
            visibility: Mutex::new(visibility),
            notices: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn is_visible(&self, control: Control) -> bool {
        self.visibility.lock().get(&control).copied().unwrap_or(false)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Emits `ControlEvent::ResetClicked`.
    pub fn click_reset(&self) {
        let _ = self.events.send(ControlEvent::ResetClicked);
    }
}

impl ControlPanel for InMemoryControls {
    fn set_visible(&self, control: Control, visible: bool) {
        self.visibility.lock().insert(control, visible);
    }

    fn show_notice(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    fn subscribe(&self) -> broadcast::Receiver<ControlEvent> {
        self.events.subscribe()
    }
}
