use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved location. Only constructible with finite, in-range degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
    address: Option<String>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64, address: Option<String>) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self {
            latitude,
            longitude,
            address,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Display address, or the coordinates when the provider gave none.
    pub fn label(&self) -> String {
        match &self.address {
            Some(address) => address.clone(),
            None => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

/// Raw geocoder answer before range checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Coordinate),
    NotFound,
}

/// Body of an isochrone request, in the routing service's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneRequest {
    /// `[lon, lat]` pairs.
    pub locations: Vec<[f64; 2]>,
    /// Seconds.
    pub range: Vec<u32>,
    pub attributes: Vec<String>,
    pub location_type: String,
    pub range_type: String,
    pub area_units: String,
    pub units: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IsochroneResponse {
    pub features: Vec<RawIsochroneFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIsochroneFeature {
    pub properties: RawIsochroneProperties,
    pub geometry: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIsochroneProperties {
    /// Seconds.
    pub value: f64,
    #[serde(default)]
    pub total_pop: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneFeature {
    pub band_index: usize,
    pub seconds: f64,
    /// GeoJSON `Polygon` or `MultiPolygon`.
    pub geometry: serde_json::Value,
    pub total_pop: Option<f64>,
}

impl IsochroneFeature {
    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }
}

/// Isochrone features keyed by band index, one per band.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsochroneSet {
    features: BTreeMap<usize, IsochroneFeature>,
}

impl IsochroneSet {
    pub fn new(features: impl IntoIterator<Item = IsochroneFeature>) -> Self {
        Self {
            features: features.into_iter().map(|f| (f.band_index, f)).collect(),
        }
    }

    pub fn get(&self, band_index: usize) -> Option<&IsochroneFeature> {
        self.features.get(&band_index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &IsochroneFeature> {
        self.features.values()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(IsochroneSet),
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn isochrones(&self) -> Option<&IsochroneSet> {
        match self {
            Self::Fetched(set) => Some(set),
            Self::Failed { .. } => None,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct MapReport {
    pub output_path: String,
    pub location: Coordinate,
    pub isochrones_drawn: bool,
    pub layer_count: usize,
    pub generated_at: DateTime<Utc>,
}
