//! Route model and directions provider.
//!
//! `model` normalizes a raw directions payload into the typed [`Route`];
//! `client` is the HTTP boundary to the directions API; `provider` ties the
//! two together for the guidance engine. One fetch per call — retry policy
//! belongs to the caller.

pub mod client;
pub mod error;
pub mod model;
pub mod provider;
pub mod types;

pub use client::{DirectionsApi, GoogleDirectionsClient};
pub use error::RouteError;
pub use model::parse_directions;
pub use provider::RouteProvider;
pub use types::{DirectionsResponse, Route, Step};
