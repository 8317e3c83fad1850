use crate::domain::artifact::MapStyle;
use crate::domain::bands::BandScheme;
use crate::domain::model::{GeocodedPlace, IsochroneRequest, IsochroneResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Free text or postal code to a place. `Ok(None)` means no match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str, country_code: &str) -> Result<Option<GeocodedPlace>>;
}

#[async_trait]
pub trait IsochroneProvider: Send + Sync {
    async fn isochrones(&self, request: &IsochroneRequest) -> Result<IsochroneResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn geocoder_endpoint(&self) -> &str;
    fn geocoder_user_agent(&self) -> &str;
    fn geocoder_timeout(&self) -> Duration;
    fn country_code(&self) -> &str;
    fn isochrone_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn isochrone_timeout(&self) -> Option<Duration>;
    fn isochrone_attributes(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn map_style(&self) -> &MapStyle;
    fn band_scheme(&self) -> Result<BandScheme>;
}
