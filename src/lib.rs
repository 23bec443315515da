//! waypoint-router
//!
//! Turns user-placed map waypoints into an optimized trip from a remote
//! routing service and keeps a single route layer on the map in sync.

pub mod coords;
pub mod error;
pub mod geojson;
pub mod haversine;
pub mod memory;
pub mod optimization;
pub mod orchestrator;
pub mod polyline;
pub mod traits;
