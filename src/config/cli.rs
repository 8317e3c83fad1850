use crate::config::toml_config::{LogFormat, MapConfig};
use crate::core::request::MapForm;
use crate::domain::bands::BandScheme;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "drive-map")]
#[command(about = "Render drive-time isochrones and a distance circle around a US location")]
pub struct CliArgs {
    /// City and state, e.g. "Denver, CO"
    #[arg(long)]
    pub city_state: Option<String>,

    /// ZIP code; takes priority over --city-state
    #[arg(long)]
    pub zip_code: Option<String>,

    /// Reference circle radius in miles
    #[arg(long)]
    pub radius: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the map file is written under
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Override map.output_path from the config
    #[arg(long)]
    pub output_path: Option<String>,

    /// OpenRouteService API key
    #[arg(long, env = "ORS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Band thresholds in minutes; must be paired with --colors
    #[arg(long, value_delimiter = ',', requires = "colors")]
    pub bands: Vec<u32>,

    /// Band colors, one per --bands entry
    #[arg(long, value_delimiter = ',', requires = "bands")]
    pub colors: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per pipeline stage")]
    pub monitor: bool,
}

impl CliArgs {
    pub fn form(&self) -> MapForm {
        MapForm {
            city_state: self.city_state.clone(),
            zip_code: self.zip_code.clone(),
            radius: self.radius.clone(),
        }
    }

    pub fn log_format(&self, config: &MapConfig) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            config.logging.format
        }
    }

    /// Load the config file (or defaults) and layer command-line overrides on top.
    pub fn load_config(&self) -> Result<MapConfig> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_file(path)?,
            None => MapConfig::default(),
        };

        if let Some(key) = &self.api_key {
            config.isochrones.api_key = Some(key.clone());
        }

        if let Some(path) = &self.output_path {
            config.map.output_path = path.clone();
        }

        if !self.bands.is_empty() || !self.colors.is_empty() {
            let scheme = BandScheme::from_parts(&self.bands, &self.colors)?;
            config.bands = scheme.bands().to_vec();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::MapError;

    #[test]
    fn test_band_overrides_are_paired() {
        let args = CliArgs::parse_from([
            "drive-map",
            "--zip-code",
            "10001",
            "--radius",
            "5",
            "--bands",
            "15,30",
            "--colors",
            "green,red",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.band_scheme().unwrap().seconds(), vec![900, 1800]);
    }

    #[test]
    fn test_band_color_count_mismatch_fails_fast() {
        let args = CliArgs::parse_from([
            "drive-map",
            "--zip-code",
            "10001",
            "--radius",
            "5",
            "--bands",
            "10,20,30",
            "--colors",
            "green,red",
        ]);
        let err = args.load_config().unwrap_err();
        assert!(matches!(err, MapError::ConfigurationInvariantViolation { .. }));
    }

    #[test]
    fn test_oversized_band_override_rejected() {
        let args = CliArgs::parse_from([
            "drive-map",
            "--zip-code",
            "10001",
            "--radius",
            "5",
            "--bands",
            "80000000",
            "--colors",
            "red",
        ]);
        let err = args.load_config().unwrap_err();
        assert!(matches!(err, MapError::ConfigurationInvariantViolation { .. }));
    }

    #[test]
    fn test_form_carries_raw_radius() {
        let args = CliArgs::parse_from([
            "drive-map",
            "--city-state",
            "Denver, CO",
            "--radius",
            "abc",
        ]);
        let form = args.form();
        assert_eq!(form.city_state.as_deref(), Some("Denver, CO"));
        assert_eq!(form.zip_code, None);
        assert_eq!(form.radius, "abc");
    }
}
