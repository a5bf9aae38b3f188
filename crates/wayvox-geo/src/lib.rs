//! Geocoordinate utilities: coordinate value type, haversine distance,
//! Google encoded-polyline decoding. Pure functions, no state.

pub mod coord;
pub mod polyline;

pub use coord::*;
pub use polyline::*;
