use serde::{Deserialize, Serialize};

pub const METERS_PER_MILE: f64 = 1609.34;

/// Visual settings for the composed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub zoom_start: u8,
    pub marker_color: String,
    /// Glyphicon name without the `glyphicon-` prefix.
    pub marker_icon: String,
    pub layer_weight: u32,
    pub layer_fill_opacity: f64,
    pub radius_color: String,
    pub radius_weight: u32,
    pub radius_dash_array: String,
    pub legend_title: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom_start: 11,
            marker_color: "red".to_string(),
            marker_icon: "info-sign".to_string(),
            layer_weight: 2,
            layer_fill_opacity: 0.3,
            radius_color: "black".to_string(),
            radius_weight: 2,
            radius_dash_array: "10".to_string(),
            legend_title: "Drive Time (minutes)".to_string(),
        }
    }
}

/// Leaflet.awesome-markers icon options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub icon: String,
    pub marker_color: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
    pub icon: MarkerIcon,
}

/// Leaflet path options for an isochrone polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: u32,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneLayer {
    pub band_index: usize,
    pub minutes: f64,
    pub style: PolygonStyle,
    pub tooltip: String,
    pub geometry: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadiusOverlay {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_miles: f64,
    pub radius_meters: f64,
    pub color: String,
    pub weight: u32,
    pub dash_array: String,
    pub fill: bool,
    pub popup: String,
}

impl RadiusOverlay {
    pub fn is_dashed(&self) -> bool {
        !self.dash_array.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    pub radius_label: String,
    pub radius_color: String,
}

/// A fully composed map. Layers are stored in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapArtifact {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_start: u8,
    pub marker: Marker,
    pub isochrone_layers: Vec<IsochroneLayer>,
    pub radius: RadiusOverlay,
    pub legend: Legend,
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}
