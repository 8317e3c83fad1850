use crate::utils::error::{MapError, Result};
use serde::Deserialize;

/// Request fields as submitted by a caller (form, CLI).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapForm {
    pub city_state: Option<String>,
    pub zip_code: Option<String>,
    pub radius: String,
}

/// A validated request ready for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    pub query: String,
    pub radius_miles: f64,
}

impl MapForm {
    /// A non-empty ZIP code wins over city/state.
    pub fn location_query(&self) -> String {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        non_empty(&self.zip_code)
            .or_else(|| non_empty(&self.city_state))
            .unwrap_or_default()
    }

    /// Radius is checked before anything else so a bad value never reaches the geocoder.
    pub fn to_request(&self) -> Result<MapRequest> {
        let radius_miles = parse_radius(&self.radius)?;
        Ok(MapRequest {
            query: self.location_query(),
            radius_miles,
        })
    }
}

pub fn parse_radius(raw: &str) -> Result<f64> {
    let invalid = || MapError::InvalidRadius {
        value: raw.to_string(),
    };

    let miles: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !miles.is_finite() || miles < 0.0 {
        return Err(invalid());
    }
    Ok(miles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(city_state: Option<&str>, zip_code: Option<&str>, radius: &str) -> MapForm {
        MapForm {
            city_state: city_state.map(str::to_string),
            zip_code: zip_code.map(str::to_string),
            radius: radius.to_string(),
        }
    }

    #[test]
    fn test_zip_code_takes_priority() {
        let request = form(Some("Denver, CO"), Some("10001"), "5").to_request().unwrap();
        assert_eq!(request.query, "10001");
        assert_eq!(request.radius_miles, 5.0);
    }

    #[test]
    fn test_blank_zip_falls_back_to_city_state() {
        let request = form(Some(" Denver, CO "), Some("  "), "12.5").to_request().unwrap();
        assert_eq!(request.query, "Denver, CO");
        assert_eq!(request.radius_miles, 12.5);
    }

    #[test]
    fn test_missing_location_yields_empty_query() {
        let request = form(None, None, "5").to_request().unwrap();
        assert_eq!(request.query, "");
    }

    #[test]
    fn test_invalid_radius_rejected() {
        for raw in ["abc", "", "NaN", "inf", "-1", "5 miles"] {
            let err = form(None, Some("10001"), raw).to_request().unwrap_err();
            assert!(
                matches!(err, MapError::InvalidRadius { .. }),
                "radius {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_radius_accepts_whitespace_and_zero() {
        assert_eq!(parse_radius(" 3 ").unwrap(), 3.0);
        assert_eq!(parse_radius("0").unwrap(), 0.0);
    }
}
