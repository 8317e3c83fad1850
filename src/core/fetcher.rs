use crate::domain::bands::BandScheme;
use crate::domain::model::{
    Coordinate, FetchOutcome, IsochroneFeature, IsochroneRequest, IsochroneResponse, IsochroneSet,
};
use crate::domain::ports::IsochroneProvider;
use crate::utils::error::{MapError, Result};

const LOCATION_TYPE: &str = "start";
const RANGE_TYPE: &str = "time";
/// Areas and distances come back in miles, matching the radius unit.
const DISTANCE_UNITS: &str = "mi";
/// How far a returned `value` may drift from the requested range.
const VALUE_TOLERANCE_SECONDS: f64 = 0.5;

/// Requests one drive-time polygon per band. Never fails the pipeline:
/// any provider problem becomes `FetchOutcome::Failed`.
pub struct IsochroneFetcher<P: IsochroneProvider> {
    provider: P,
    attributes: Vec<String>,
}

impl<P: IsochroneProvider> IsochroneFetcher<P> {
    pub fn new(provider: P, attributes: Vec<String>) -> Self {
        Self {
            provider,
            attributes,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn build_request(&self, coordinate: &Coordinate, scheme: &BandScheme) -> IsochroneRequest {
        IsochroneRequest {
            locations: vec![[coordinate.longitude(), coordinate.latitude()]],
            range: scheme.seconds(),
            attributes: self.attributes.clone(),
            location_type: LOCATION_TYPE.to_string(),
            range_type: RANGE_TYPE.to_string(),
            area_units: DISTANCE_UNITS.to_string(),
            units: DISTANCE_UNITS.to_string(),
        }
    }

    pub async fn fetch(&self, coordinate: &Coordinate, scheme: &BandScheme) -> FetchOutcome {
        let request = self.build_request(coordinate, scheme);

        let result = self
            .provider
            .isochrones(&request)
            .await
            .and_then(|response| align_features(scheme, response));

        match result {
            Ok(set) => {
                tracing::info!("🗺️ Received {} isochrone bands", set.len());
                FetchOutcome::Fetched(set)
            }
            Err(e) => {
                tracing::warn!("Isochrone fetch failed, continuing without drive-time layers: {}", e);
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn malformed(message: String) -> MapError {
    MapError::InvalidResponse {
        provider: "isochrone provider".to_string(),
        message,
    }
}

/// Pairs each returned feature with the band whose range it answers.
/// Anything other than exactly one polygon per band is malformed.
fn align_features(scheme: &BandScheme, response: IsochroneResponse) -> Result<IsochroneSet> {
    if response.features.len() != scheme.len() {
        return Err(malformed(format!(
            "expected {} features, got {}",
            scheme.len(),
            response.features.len()
        )));
    }

    let band_seconds = scheme.seconds();
    let mut taken = vec![false; band_seconds.len()];
    let mut features = Vec::with_capacity(band_seconds.len());

    for raw in response.features {
        let value = raw.properties.value;
        let band_index = band_seconds
            .iter()
            .position(|s| (f64::from(*s) - value).abs() <= VALUE_TOLERANCE_SECONDS)
            .ok_or_else(|| malformed(format!("feature value {}s matches no requested band", value)))?;

        if taken[band_index] {
            return Err(malformed(format!("duplicate feature for {}s", value)));
        }
        taken[band_index] = true;

        let geometry_type = raw.geometry.get("type").and_then(serde_json::Value::as_str);
        if !matches!(geometry_type, Some("Polygon") | Some("MultiPolygon")) {
            return Err(malformed(format!(
                "feature for {}s has geometry type {:?}",
                value, geometry_type
            )));
        }

        features.push(IsochroneFeature {
            band_index,
            seconds: value,
            geometry: raw.geometry,
            total_pop: raw.properties.total_pop,
        });
    }

    Ok(IsochroneSet::new(features))
}
