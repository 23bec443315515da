//! GeoJSON types for the route render layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coords::swap_axes;
use crate::polyline::Polyline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Coordinates are (lng, lat).
    LineString { coordinates: Vec<(f64, f64)> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Feature {
    Feature {
        properties: Map<String, Value>,
        geometry: Geometry,
    },
}

impl Feature {
    /// Builds a line feature from a (lat, lng) polyline, flipping to GeoJSON order.
    pub fn line_from(polyline: &Polyline) -> Self {
        Feature::Feature {
            properties: Map::new(),
            geometry: Geometry::LineString {
                coordinates: polyline.points().iter().copied().map(swap_axes).collect(),
            },
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Feature::Feature { geometry, .. } => geometry,
        }
    }

    /// Line coordinates in (lng, lat) order.
    pub fn coordinates(&self) -> &[(f64, f64)] {
        match self.geometry() {
            Geometry::LineString { coordinates } => coordinates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Bevel,
    Round,
    Miter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// Paint and layout for the route line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineStyle {
    pub line_color: String,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            line_color: "#ff6347".to_string(),
            line_width: 8.0,
            line_join: LineJoin::Round,
            line_cap: LineCap::Round,
        }
    }
}

/// A named line layer handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLayer {
    pub id: String,
    pub source: Feature,
    pub style: LineStyle,
}
