//! Real Philadelphia locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. These are routable locations that
//! work with OSRM Pennsylvania data.

#![allow(dead_code)]

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Center City landmarks
// ============================================================================

pub const CITY_HALL: Location = Location::new("City Hall", 39.9524, -75.1636);

pub const LANDMARKS: &[Location] = &[
    CITY_HALL,
    Location::new("Liberty Bell", 39.9496, -75.1503),
    Location::new("Reading Terminal Market", 39.9533, -75.1590),
    Location::new("Rittenhouse Square", 39.9496, -75.1718),
    Location::new("Philadelphia Museum of Art", 39.9656, -75.1810),
    Location::new("30th Street Station", 39.9557, -75.1820),
    Location::new("Eastern State Penitentiary", 39.9684, -75.1727),
    Location::new("Penn's Landing", 39.9456, -75.1410),
];

// ============================================================================
// South Philadelphia sports complex
// ============================================================================

pub const STADIUMS: &[Location] = &[
    Location::new("Citizens Bank Park", 39.9061, -75.1665),
    Location::new("Wells Fargo Center", 39.9012, -75.1720),
    Location::new("Lincoln Financial Field", 39.9008, -75.1675),
];

/// The two points used throughout the route tests.
pub const POINT_A: Location = Location::new("Point A", 39.95, -75.16);
pub const POINT_B: Location = Location::new("Point B", 39.90, -75.20);
