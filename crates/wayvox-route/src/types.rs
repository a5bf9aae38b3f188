//! Wire-format payloads from the directions API and the typed route model
//! the rest of the system consumes.

use serde::Deserialize;
use wayvox_geo::Coordinate;

// ---------------------------------------------------------------------------
// Wire format (Google Directions JSON shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub legs: Vec<RawLeg>,
    pub overview_polyline: RawPolyline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLeg {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStep {
    pub html_instructions: String,
    pub end_location: RawLatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPolyline {
    pub points: String,
}

impl From<RawLatLng> for Coordinate {
    fn from(raw: RawLatLng) -> Self {
        Coordinate::new(raw.lat, raw.lng)
    }
}

// ---------------------------------------------------------------------------
// Typed route model
// ---------------------------------------------------------------------------

/// One instruction-bearing segment of a route. Immutable after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 0-based position in the route's traversal order.
    pub index: usize,
    /// Plain-text instruction, markup stripped.
    pub instruction: String,
    /// Where this step ends; proximity to this point announces the step.
    pub end_point: Coordinate,
}

/// A parsed walking route. Replaced wholesale on re-route, never mutated.
#[derive(Debug, Clone)]
pub struct Route {
    /// Steps in traversal order. Order is significant and preserved from
    /// the provider exactly.
    pub steps: Vec<Step>,
    pub destination: Coordinate,
    pub destination_name: String,
    /// Decoded overview path, for display only. The guidance logic never
    /// reads it.
    pub render_path: Vec<Coordinate>,
}
