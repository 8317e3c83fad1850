use crate::domain::artifact::MapStyle;
use crate::domain::bands::{default_band_styles, BandScheme, BandStyle};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_ISOCHRONE_ENDPOINT: &str =
    "https://api.openrouteservice.org/v2/isochrones/driving-car";
pub const DEFAULT_OUTPUT_PATH: &str = "static/city_map_with_radius.html";

/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub geocoder: GeocoderConfig,
    pub isochrones: IsochroneConfig,
    pub map: MapSection,
    pub logging: LoggingConfig,
    pub bands: Vec<BandStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub country_code: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsochroneConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub attributes: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSection {
    pub output_path: String,
    #[serde(flatten)]
    pub style: MapStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            geocoder: GeocoderConfig::default(),
            isochrones: IsochroneConfig::default(),
            map: MapSection::default(),
            logging: LoggingConfig::default(),
            bands: default_band_styles(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            country_code: "us".to_string(),
            user_agent: "my_map_application".to_string(),
            timeout_seconds: 5,
        }
    }
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ISOCHRONE_ENDPOINT.to_string(),
            api_key: None,
            attributes: vec!["total_pop".to_string()],
            timeout_seconds: None,
        }
    }
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            style: MapStyle::default(),
        }
    }
}

impl MapConfig {
    /// Load from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validation::validate_non_empty_string("geocoder.country_code", &self.geocoder.country_code)?;
        validation::validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validation::validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder.timeout_seconds,
            1,
        )?;

        validation::validate_url("isochrones.endpoint", &self.isochrones.endpoint)?;
        if let Some(timeout) = self.isochrones.timeout_seconds {
            validation::validate_positive_number("isochrones.timeout_seconds", timeout, 1)?;
        }

        validation::validate_path("map.output_path", &self.map.output_path)?;
        validation::validate_range("map.zoom_start", self.map.style.zoom_start, 1, 18)?;
        validation::validate_range(
            "map.layer_fill_opacity",
            self.map.style.layer_fill_opacity,
            0.0,
            1.0,
        )?;

        self.band_scheme().map(|_| ())
    }
}

impl ConfigProvider for MapConfig {
    fn geocoder_endpoint(&self) -> &str {
        &self.geocoder.endpoint
    }

    fn geocoder_user_agent(&self) -> &str {
        &self.geocoder.user_agent
    }

    fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder.timeout_seconds)
    }

    fn country_code(&self) -> &str {
        &self.geocoder.country_code
    }

    fn isochrone_endpoint(&self) -> &str {
        &self.isochrones.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        // An unset `${ORS_API_KEY}` survives substitution verbatim.
        self.isochrones
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    fn isochrone_timeout(&self) -> Option<Duration> {
        self.isochrones.timeout_seconds.map(Duration::from_secs)
    }

    fn isochrone_attributes(&self) -> &[String] {
        &self.isochrones.attributes
    }

    fn output_path(&self) -> &str {
        &self.map.output_path
    }

    fn map_style(&self) -> &MapStyle {
        &self.map.style
    }

    fn band_scheme(&self) -> Result<BandScheme> {
        BandScheme::new(self.bands.clone())
    }
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MapConfig::from_toml_str("").unwrap();

        assert_eq!(config.geocoder.endpoint, DEFAULT_GEOCODER_ENDPOINT);
        assert_eq!(config.country_code(), "us");
        assert_eq!(config.isochrone_endpoint(), DEFAULT_ISOCHRONE_ENDPOINT);
        assert_eq!(config.isochrone_attributes(), &["total_pop".to_string()]);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.map_style().zoom_start, 11);
        assert_eq!(config.band_scheme().unwrap(), BandScheme::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[geocoder]
endpoint = "http://localhost:8080/search"
country_code = "ca"
timeout_seconds = 2

[isochrones]
endpoint = "http://localhost:8081/v2/isochrones/driving-car"
api_key = "secret"
timeout_seconds = 30

[map]
output_path = "out/map.html"
zoom_start = 10
radius_color = "blue"

[logging]
format = "json"

[[bands]]
minutes = 15
color = "teal"

[[bands]]
minutes = 30
color = "navy"
"#;

        let config = MapConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.country_code(), "ca");
        assert_eq!(config.geocoder_timeout(), Duration::from_secs(2));
        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.isochrone_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.output_path(), "out/map.html");
        assert_eq!(config.map_style().zoom_start, 10);
        assert_eq!(config.map_style().radius_color, "blue");
        assert_eq!(config.map_style().radius_dash_array, "10");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.band_scheme().unwrap().seconds(), vec![900, 1800]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DRIVE_MAP_TEST_ORS_KEY", "key-from-env");

        let toml_content = r#"
[isochrones]
api_key = "${DRIVE_MAP_TEST_ORS_KEY}"
"#;

        let config = MapConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("key-from-env"));

        std::env::remove_var("DRIVE_MAP_TEST_ORS_KEY");
    }

    #[test]
    fn test_unset_env_var_means_no_api_key() {
        let toml_content = r#"
[isochrones]
api_key = "${DRIVE_MAP_TEST_NEVER_SET}"
"#;

        let config = MapConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_non_increasing_bands_fail_validation() {
        let toml_content = r#"
[[bands]]
minutes = 30
color = "green"

[[bands]]
minutes = 20
color = "red"
"#;

        let config = MapConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MapError::ConfigurationInvariantViolation { .. }));
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let toml_content = r#"
[geocoder]
endpoint = "invalid-url"
"#;

        let config = MapConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[map]\noutput_path = \"maps/latest.html\"\n")
            .unwrap();

        let config = MapConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "maps/latest.html");
    }
}
