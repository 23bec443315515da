//! Test fixtures for waypoint-router.
//!
//! Provides realistic test data including:
//! - Real Philadelphia locations (from OpenStreetMap)
//! - Scripted route providers for driving the orchestrator

#![allow(dead_code)]

pub mod philadelphia_locations;
pub mod routers;

pub use philadelphia_locations::*;
