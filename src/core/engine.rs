use crate::adapters::{NominatimGeocoder, OpenRouteServiceClient};
use crate::core::composer::MapComposer;
use crate::core::fetcher::IsochroneFetcher;
use crate::core::request::{MapForm, MapRequest};
use crate::core::resolver::LocationResolver;
use crate::domain::model::{MapReport, Resolution};
use crate::domain::ports::{ConfigProvider, Geocoder, IsochroneProvider, Storage};
use crate::utils::error::{MapError, Result};
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

/// Resolve, fetch, compose, publish. One request at a time; every run
/// overwrites the same output file.
pub struct MapEngine<G: Geocoder, P: IsochroneProvider, S: Storage> {
    resolver: LocationResolver<G>,
    fetcher: IsochroneFetcher<P>,
    composer: MapComposer,
    storage: S,
    output_path: String,
    monitor: SystemMonitor,
}

impl<G: Geocoder, P: IsochroneProvider, S: Storage> MapEngine<G, P, S> {
    pub fn new(
        resolver: LocationResolver<G>,
        fetcher: IsochroneFetcher<P>,
        composer: MapComposer,
        storage: S,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            composer,
            storage,
            output_path: output_path.into(),
            monitor: SystemMonitor::default(),
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        if self.monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }
        self
    }

    /// Validates the form, then runs the pipeline.
    pub async fn handle_form(&self, form: &MapForm) -> Result<MapReport> {
        let request = form.to_request()?;
        self.run(&request).await
    }

    pub async fn run(&self, request: &MapRequest) -> Result<MapReport> {
        tracing::info!(
            "🚀 Generating map for '{}' with a {} mile radius",
            request.query,
            request.radius_miles
        );

        let coordinate = match self.resolver.resolve(&request.query).await {
            Resolution::Found(coordinate) => coordinate,
            Resolution::NotFound => {
                return Err(MapError::LocationNotFound {
                    query: request.query.clone(),
                })
            }
        };
        self.monitor.log_stage("Resolve");

        let outcome = self.fetcher.fetch(&coordinate, self.composer.scheme()).await;
        self.monitor.log_stage("Fetch");

        let artifact =
            self.composer
                .compose(&coordinate, request.radius_miles, outcome.isochrones());
        let output_path = self
            .composer
            .publish(&artifact, &self.storage, &self.output_path)
            .await?;
        self.monitor.log_stage("Publish");

        let report = MapReport {
            output_path,
            location: coordinate,
            isochrones_drawn: outcome.isochrones().is_some(),
            layer_count: artifact.isochrone_layers.len(),
            generated_at: Utc::now(),
        };

        tracing::info!(
            "✅ Map written to {} ({} drive-time layers)",
            report.output_path,
            report.layer_count
        );
        self.monitor.log_summary();

        Ok(report)
    }
}

impl<S: Storage> MapEngine<NominatimGeocoder, OpenRouteServiceClient, S> {
    /// Wires the Nominatim and OpenRouteService adapters from configuration.
    pub fn from_config<C: ConfigProvider>(config: &C, storage: S) -> Result<Self> {
        let resolver = LocationResolver::new(
            NominatimGeocoder::from_config(config)?,
            config.country_code(),
        );
        let fetcher = IsochroneFetcher::new(
            OpenRouteServiceClient::from_config(config)?,
            config.isochrone_attributes().to_vec(),
        );
        let composer = MapComposer::new(config.band_scheme()?, config.map_style().clone());

        Ok(Self::new(
            resolver,
            fetcher,
            composer,
            storage,
            config.output_path(),
        ))
    }
}
