use crate::domain::model::GeocodedPlace;
use crate::domain::ports::{ConfigProvider, Geocoder};
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "Nominatim";

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search, first match only.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.geocoder_endpoint(),
            config.geocoder_user_agent(),
            config.geocoder_timeout(),
        )
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| MapError::InvalidResponse {
            provider: PROVIDER.to_string(),
            message: format!("{} '{}' is not a number: {}", field, raw, e),
        })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str, country_code: &str) -> Result<Option<GeocodedPlace>> {
        tracing::debug!("Geocoding '{}' via {}", query, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", country_code),
                ("addressdetails", "0"),
            ])
            .send()
            .await?;

        tracing::debug!("Geocoder response status: {}", response.status());
        let results: Vec<NominatimResult> = response.error_for_status()?.json().await?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(GeocodedPlace {
            latitude: parse_degrees("lat", &first.lat)?,
            longitude: parse_degrees("lon", &first.lon)?,
            display_name: first.display_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(server.url("/search"), "drive-map-tests", Duration::from_secs(2))
            .unwrap()
    }

    #[tokio::test]
    async fn test_geocode_first_result() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "10001")
                .query_param("format", "json")
                .query_param("limit", "1")
                .query_param("countrycodes", "us")
                .header("user-agent", "drive-map-tests");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"lat": "40.7484", "lon": "-73.9967", "display_name": "New York, NY 10001, United States"},
                    {"lat": "0", "lon": "0", "display_name": "ignored"}
                ]));
        });

        let place = geocoder(&server).geocode("10001", "us").await.unwrap().unwrap();

        api_mock.assert();
        assert_eq!(place.latitude, 40.7484);
        assert_eq!(place.longitude, -73.9967);
        assert_eq!(
            place.display_name.as_deref(),
            Some("New York, NY 10001, United States")
        );
    }

    #[tokio::test]
    async fn test_geocode_no_match() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!([]));
        });

        let place = geocoder(&server).geocode("Nowhereville, ZZ", "us").await.unwrap();
        assert!(place.is_none());
    }

    #[tokio::test]
    async fn test_geocode_non_numeric_latitude() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .json_body(serde_json::json!([{"lat": "north", "lon": "-73.9", "display_name": "x"}]));
        });

        let err = geocoder(&server).geocode("10001", "us").await.unwrap_err();
        assert!(matches!(err, MapError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_geocode_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        });

        let err = geocoder(&server).geocode("10001", "us").await.unwrap_err();
        assert!(matches!(err, MapError::HttpError(_)));
    }
}
