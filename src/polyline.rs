//! Polyline representation for route geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences, plus the encoded polyline algorithm used by the
//! trip service when `polyline` or `polyline6` geometries are requested.
//! Encoding/decoding happens at the boundary (when receiving from the
//! service), never inside the orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Precision of the `polyline` geometry format (1e-5 degrees).
pub const PRECISION_5: u32 = 5;

/// Precision of the `polyline6` geometry format (1e-6 degrees).
pub const PRECISION_6: u32 = 6;

/// A polyline representing a route geometry as decoded coordinates.
///
/// Stores latitude/longitude points in path order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("encoded polyline ends in the middle of a value at byte {position}")]
    Truncated { position: usize },
    #[error("invalid byte {byte:#04x} in encoded polyline at byte {position}")]
    InvalidByte { byte: u8, position: usize },
    #[error("encoded polyline value at byte {position} overflows")]
    Overflow { position: usize },
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last points, if any.
    pub fn endpoints(&self) -> Option<((f64, f64), (f64, f64))> {
        Some((*self.points.first()?, *self.points.last()?))
    }

    /// Decodes an encoded polyline string with the given precision.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10f64.powi(precision as i32);
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat += next_value(bytes, &mut index)?;
            lng += next_value(bytes, &mut index)?;
            points.push((lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the polyline with the given precision.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let mut prev = (0i64, 0i64);

        for &(lat, lng) in &self.points {
            let lat = (lat * factor).round() as i64;
            let lng = (lng * factor).round() as i64;
            push_value(lat - prev.0, &mut out);
            push_value(lng - prev.1, &mut out);
            prev = (lat, lng);
        }

        out
    }
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(PolylineError::Truncated { position: *index })?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                position: *index,
            });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow { position: start });
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

fn push_value(value: i64, out: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };
    while value >= 0x20 {
        out.push(((0x20 | (value & 0x1f)) + 63) as u8 as char);
        value >>= 5;
    }
    out.push((value + 63) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_new_and_points() {
        let points = vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
        assert_eq!(polyline.len(), 3);
    }

    #[test]
    fn test_into_points() {
        let points = vec![(38.5, -120.2), (40.7, -120.95)];
        let polyline = Polyline::new(points.clone());
        let owned = polyline.into_points();
        assert_eq!(owned, points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.is_empty());
        assert_eq!(polyline.endpoints(), None);
    }

    #[test]
    fn test_endpoints() {
        let polyline = Polyline::new(vec![(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        assert_eq!(polyline.endpoints(), Some(((1.0, 2.0), (5.0, 6.0))));
    }

    #[test]
    fn test_decode_reference_string() {
        let polyline = Polyline::decode(REFERENCE, PRECISION_5).unwrap();
        assert_eq!(
            polyline.points(),
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
        );
    }

    #[test]
    fn test_encode_reference_points() {
        let polyline = Polyline::new(vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]);
        assert_eq!(polyline.encode(PRECISION_5), REFERENCE);
    }

    #[test]
    fn test_decode_precision_6() {
        let polyline = Polyline::new(vec![(39.952583, -75.165222), (39.9012, -75.172)]);
        let encoded = polyline.encode(PRECISION_6);
        let decoded = Polyline::decode(&encoded, PRECISION_6).unwrap();
        assert_eq!(decoded, polyline);
    }

    #[test]
    fn test_decode_empty_string() {
        assert!(Polyline::decode("", PRECISION_5).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Drop the final chunk so the last longitude never terminates.
        let truncated = &REFERENCE[..REFERENCE.len() - 1];
        let err = Polyline::decode(truncated, PRECISION_5).unwrap_err();
        assert!(matches!(err, PolylineError::Truncated { .. }));
    }

    #[test]
    fn test_decode_invalid_byte() {
        let err = Polyline::decode("_p~iF ps|U", PRECISION_5).unwrap_err();
        assert_eq!(
            err,
            PolylineError::InvalidByte {
                byte: b' ',
                position: 5
            }
        );
    }
}
