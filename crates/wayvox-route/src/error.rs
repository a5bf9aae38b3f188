use thiserror::Error;
use wayvox_geo::PolylineError;

#[derive(Error, Debug)]
pub enum RouteError {
    /// Network, timeout, or non-success HTTP status from the directions API.
    #[error("Route fetch failed: {0}")]
    FetchFailed(String),

    /// The provider answered but returned no usable legs or steps.
    #[error("No route found between origin and destination")]
    NoRouteFound,

    #[error("Invalid {which} coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        which: &'static str,
        latitude: f64,
        longitude: f64,
    },

    #[error("Malformed route path: {0}")]
    MalformedPath(#[from] PolylineError),
}

impl From<reqwest::Error> for RouteError {
    fn from(e: reqwest::Error) -> Self {
        RouteError::FetchFailed(e.to_string())
    }
}
