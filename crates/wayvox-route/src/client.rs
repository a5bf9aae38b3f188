//! HTTP boundary to the walking-directions API.

use crate::error::RouteError;
use crate::types::DirectionsResponse;
use async_trait::async_trait;
use std::time::Duration;
use wayvox_geo::Coordinate;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Directions API boundary. The guidance core depends only on this shape;
/// transport, endpoint, and credentials are implementation concerns.
#[async_trait]
pub trait DirectionsApi: Send + Sync {
    async fn walking_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DirectionsResponse, RouteError>;
}

/// Google Directions client. One GET per call, no internal retry.
#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point at a different endpoint (tests, proxies).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("reqwest client with static configuration");
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        }
    }
}

#[async_trait]
impl DirectionsApi for GoogleDirectionsClient {
    async fn walking_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DirectionsResponse, RouteError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                (
                    "origin",
                    format!("{},{}", origin.latitude, origin.longitude),
                ),
                (
                    "destination",
                    format!("{},{}", destination.latitude, destination.longitude),
                ),
                ("mode", "walking".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::FetchFailed(format!(
                "directions API returned HTTP {}",
                status
            )));
        }

        let payload = response.json::<DirectionsResponse>().await.map_err(|e| {
            RouteError::FetchFailed(format!("malformed directions payload: {}", e))
        })?;
        tracing::debug!(routes = payload.routes.len(), "Directions response received");
        Ok(payload)
    }
}
