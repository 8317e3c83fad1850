use crate::domain::model::{IsochroneRequest, IsochroneResponse};
use crate::domain::ports::{ConfigProvider, IsochroneProvider};
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

const PROVIDER: &str = "OpenRouteService";
const ACCEPT_VALUE: &str =
    "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";
const MAX_ERROR_BODY: usize = 200;

/// OpenRouteService isochrone endpoint client.
pub struct OpenRouteServiceClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenRouteServiceClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        if config.api_key().is_none() {
            tracing::warn!("No OpenRouteService API key configured; isochrone requests will likely be rejected");
        }

        Self::new(
            config.isochrone_endpoint(),
            config.api_key().map(str::to_string),
            config.isochrone_timeout(),
        )
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl IsochroneProvider for OpenRouteServiceClient {
    async fn isochrones(&self, request: &IsochroneRequest) -> Result<IsochroneResponse> {
        tracing::debug!(
            "Requesting {} isochrone ranges from {}",
            request.range.len(),
            self.endpoint
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPT_VALUE)
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, key);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Isochrone response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(MapError::FetchFailed {
                reason: format!("{} returned {}: {}", PROVIDER, status, truncate(&body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| MapError::InvalidResponse {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn request() -> IsochroneRequest {
        IsochroneRequest {
            locations: vec![[-73.9967, 40.7484]],
            range: vec![600, 1200],
            attributes: vec!["total_pop".to_string()],
            location_type: "start".to_string(),
            range_type: "time".to_string(),
            area_units: "mi".to_string(),
            units: "mi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_body_with_authorization() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/isochrones/driving-car")
                .header("authorization", "test-key")
                .json_body(serde_json::json!({
                    "locations": [[-73.9967, 40.7484]],
                    "range": [600, 1200],
                    "attributes": ["total_pop"],
                    "location_type": "start",
                    "range_type": "time",
                    "area_units": "mi",
                    "units": "mi"
                }));
            then.status(200).json_body(serde_json::json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"value": 600.0, "total_pop": 1200.0},
                     "geometry": {"type": "Polygon", "coordinates": [[[-74.0, 40.7], [-73.9, 40.7], [-73.9, 40.8], [-74.0, 40.7]]]}},
                    {"type": "Feature", "properties": {"value": 1200.0},
                     "geometry": {"type": "Polygon", "coordinates": [[[-74.1, 40.6], [-73.8, 40.6], [-73.8, 40.9], [-74.1, 40.6]]]}}
                ]
            }));
        });

        let client = OpenRouteServiceClient::new(
            server.url("/v2/isochrones/driving-car"),
            Some("test-key".to_string()),
            None,
        )
        .unwrap();
        let response = client.isochrones(&request()).await.unwrap();

        api_mock.assert();
        assert_eq!(response.features.len(), 2);
        assert_eq!(response.features[0].properties.value, 600.0);
        assert_eq!(response.features[0].properties.total_pop, Some(1200.0));
        assert_eq!(response.features[1].properties.total_pop, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/iso");
            then.status(500).body("internal error");
        });

        let client = OpenRouteServiceClient::new(server.url("/iso"), None, None).unwrap();
        let err = client.isochrones(&request()).await.unwrap_err();

        assert!(matches!(err, MapError::FetchFailed { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/iso");
            then.status(200).body("{\"type\": \"FeatureCollection\"}");
        });

        let client = OpenRouteServiceClient::new(server.url("/iso"), None, None).unwrap();
        let err = client.isochrones(&request()).await.unwrap_err();
        assert!(matches!(err, MapError::InvalidResponse { .. }));
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), MAX_ERROR_BODY);
        assert_eq!(truncate("short"), "short");
    }
}
