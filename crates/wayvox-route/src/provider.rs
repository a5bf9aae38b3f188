//! Orchestrates one directions fetch and normalization into a [`Route`].

use crate::client::DirectionsApi;
use crate::error::RouteError;
use crate::model::parse_directions;
use crate::types::Route;
use std::sync::Arc;
use wayvox_geo::Coordinate;

/// Fetches a walking route to a fixed destination. Performs exactly one
/// network call per `fetch_route`; the guidance engine owns retry policy.
pub struct RouteProvider {
    api: Arc<dyn DirectionsApi>,
    destination: Coordinate,
    destination_name: String,
}

impl std::fmt::Debug for RouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteProvider")
            .field("destination", &self.destination)
            .field("destination_name", &self.destination_name)
            .finish_non_exhaustive()
    }
}

impl RouteProvider {
    pub fn new(
        api: Arc<dyn DirectionsApi>,
        destination: Coordinate,
        destination_name: impl Into<String>,
    ) -> Result<Self, RouteError> {
        if !destination.is_valid() {
            return Err(RouteError::InvalidCoordinate {
                which: "destination",
                latitude: destination.latitude,
                longitude: destination.longitude,
            });
        }
        Ok(Self {
            api,
            destination,
            destination_name: destination_name.into(),
        })
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Fetch a route from `origin` to the fixed destination.
    pub async fn fetch_route(&self, origin: Coordinate) -> Result<Route, RouteError> {
        if !origin.is_valid() {
            return Err(RouteError::InvalidCoordinate {
                which: "origin",
                latitude: origin.latitude,
                longitude: origin.longitude,
            });
        }

        tracing::info!(
            origin_lat = origin.latitude,
            origin_lng = origin.longitude,
            destination = %self.destination_name,
            "Fetching walking route"
        );
        let raw = self
            .api
            .walking_directions(origin, self.destination)
            .await?;
        let route = parse_directions(&raw, self.destination, &self.destination_name)?;
        tracing::info!(steps = route.steps.len(), "Route parsed");
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DirectionsResponse, RawLatLng, RawLeg, RawPolyline, RawRoute, RawStep};
    use async_trait::async_trait;

    struct CannedApi {
        payload: DirectionsResponse,
    }

    #[async_trait]
    impl DirectionsApi for CannedApi {
        async fn walking_directions(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> Result<DirectionsResponse, RouteError> {
            Ok(self.payload.clone())
        }
    }

    struct FailingApi;

    #[async_trait]
    impl DirectionsApi for FailingApi {
        async fn walking_directions(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> Result<DirectionsResponse, RouteError> {
            Err(RouteError::FetchFailed("connection refused".into()))
        }
    }

    fn one_step_payload() -> DirectionsResponse {
        DirectionsResponse {
            routes: vec![RawRoute {
                legs: vec![RawLeg {
                    steps: vec![RawStep {
                        html_instructions: "Head <b>north</b>".into(),
                        end_location: RawLatLng {
                            lat: 13.71,
                            lng: 100.51,
                        },
                    }],
                }],
                overview_polyline: RawPolyline { points: "".into() },
            }],
        }
    }

    #[tokio::test]
    async fn fetches_and_parses_a_route() {
        let provider = RouteProvider::new(
            Arc::new(CannedApi {
                payload: one_step_payload(),
            }),
            Coordinate::new(13.72, 100.52),
            "Market",
        )
        .unwrap();

        let route = provider
            .fetch_route(Coordinate::new(13.70, 100.50))
            .await
            .unwrap();
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.steps[0].instruction, "Head north");
        assert_eq!(route.destination_name, "Market");
    }

    #[tokio::test]
    async fn rejects_invalid_origin_without_network_call() {
        let provider = RouteProvider::new(
            Arc::new(FailingApi),
            Coordinate::new(13.72, 100.52),
            "Market",
        )
        .unwrap();

        let err = provider
            .fetch_route(Coordinate::new(200.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::InvalidCoordinate { which: "origin", .. }
        ));
    }

    #[tokio::test]
    async fn surfaces_fetch_failures() {
        let provider = RouteProvider::new(
            Arc::new(FailingApi),
            Coordinate::new(13.72, 100.52),
            "Market",
        )
        .unwrap();

        let err = provider
            .fetch_route(Coordinate::new(13.70, 100.50))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::FetchFailed(_)));
    }

    #[test]
    fn rejects_invalid_destination_at_construction() {
        let err = RouteProvider::new(Arc::new(FailingApi), Coordinate::new(0.0, 999.0), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::InvalidCoordinate {
                which: "destination",
                ..
            }
        ));
    }
}
