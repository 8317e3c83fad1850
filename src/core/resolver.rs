use crate::domain::model::{Coordinate, Resolution};
use crate::domain::ports::Geocoder;

/// Turns a query into a coordinate. Every provider failure is a plain
/// `NotFound`; there are no retries.
pub struct LocationResolver<G: Geocoder> {
    geocoder: G,
    country_code: String,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G, country_code: impl Into<String>) -> Self {
        Self {
            geocoder,
            country_code: country_code.into(),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        let query = query.trim();
        if query.is_empty() {
            tracing::info!("Empty location query, nothing to resolve");
            return Resolution::NotFound;
        }

        match self.geocoder.geocode(query, &self.country_code).await {
            Ok(Some(place)) => {
                match Coordinate::new(place.latitude, place.longitude, place.display_name) {
                    Some(coordinate) => {
                        tracing::info!(
                            "📍 Resolved '{}' to ({:.5}, {:.5}) {}",
                            query,
                            coordinate.latitude(),
                            coordinate.longitude(),
                            coordinate.address().unwrap_or_default()
                        );
                        Resolution::Found(coordinate)
                    }
                    None => {
                        tracing::warn!(
                            "Geocoder returned out-of-range coordinates ({}, {}) for '{}'",
                            place.latitude,
                            place.longitude,
                            query
                        );
                        Resolution::NotFound
                    }
                }
            }
            Ok(None) => {
                tracing::info!("No {} match for '{}'", self.country_code, query);
                Resolution::NotFound
            }
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", query, e);
                Resolution::NotFound
            }
        }
    }
}
