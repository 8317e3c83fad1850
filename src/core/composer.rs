use crate::core::render;
use crate::domain::artifact::{
    miles_to_meters, IsochroneLayer, Legend, LegendEntry, MapArtifact, MapStyle, Marker,
    MarkerIcon, PolygonStyle, RadiusOverlay,
};
use crate::domain::bands::BandScheme;
use crate::domain::model::{Coordinate, IsochroneSet};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Builds the map for one request. Composition is pure; `publish` is the
/// only step with a side effect.
pub struct MapComposer {
    scheme: BandScheme,
    style: MapStyle,
}

impl MapComposer {
    pub fn new(scheme: BandScheme, style: MapStyle) -> Self {
        Self { scheme, style }
    }

    pub fn scheme(&self) -> &BandScheme {
        &self.scheme
    }

    pub fn compose(
        &self,
        coordinate: &Coordinate,
        radius_miles: f64,
        isochrones: Option<&IsochroneSet>,
    ) -> MapArtifact {
        let marker = Marker {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            popup: coordinate.label(),
            icon: MarkerIcon {
                icon: self.style.marker_icon.clone(),
                marker_color: self.style.marker_color.clone(),
                prefix: "glyphicon".to_string(),
            },
        };

        let isochrone_layers = isochrones
            .map(|set| self.isochrone_layers(set))
            .unwrap_or_default();

        MapArtifact {
            center_latitude: coordinate.latitude(),
            center_longitude: coordinate.longitude(),
            zoom_start: self.style.zoom_start,
            marker,
            isochrone_layers,
            radius: self.radius_overlay(coordinate, radius_miles),
            legend: self.legend(),
        }
    }

    /// Largest band first so faster regions end up drawn on top.
    fn isochrone_layers(&self, set: &IsochroneSet) -> Vec<IsochroneLayer> {
        set.iter()
            .rev()
            .filter_map(|feature| {
                let band = self.scheme.get(feature.band_index)?;
                let minutes = feature.minutes();
                Some(IsochroneLayer {
                    band_index: feature.band_index,
                    minutes,
                    style: PolygonStyle {
                        fill_color: band.color.clone(),
                        color: band.color.clone(),
                        weight: self.style.layer_weight,
                        fill_opacity: self.style.layer_fill_opacity,
                    },
                    tooltip: format!("{} min drive time", minutes.round()),
                    geometry: feature.geometry.clone(),
                })
            })
            .collect()
    }

    fn radius_overlay(&self, coordinate: &Coordinate, radius_miles: f64) -> RadiusOverlay {
        RadiusOverlay {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            radius_miles,
            radius_meters: miles_to_meters(radius_miles),
            color: self.style.radius_color.clone(),
            weight: self.style.radius_weight,
            dash_array: self.style.radius_dash_array.clone(),
            fill: false,
            popup: format!("{} mile radius", radius_miles),
        }
    }

    // Always the configured scheme, whatever the routing service returned.
    fn legend(&self) -> Legend {
        Legend {
            title: self.style.legend_title.clone(),
            entries: self
                .scheme
                .ranges()
                .map(|range| LegendEntry {
                    label: format!("{}-{}", range.lower, range.upper),
                    color: range.color.to_string(),
                })
                .collect(),
            radius_label: "Distance radius".to_string(),
            radius_color: self.style.radius_color.clone(),
        }
    }

    /// Renders the artifact and writes it to `path`, replacing any previous map.
    pub async fn publish<S: Storage>(
        &self,
        artifact: &MapArtifact,
        storage: &S,
        path: &str,
    ) -> Result<String> {
        let html = render::to_html(artifact)?;
        tracing::debug!("Writing map ({} bytes) to {}", html.len(), path);
        storage.write_file(path, html.as_bytes()).await
    }
}
