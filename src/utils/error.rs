use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Location not found: '{query}'")]
    LocationNotFound { query: String },

    #[error("Invalid radius value: '{value}'")]
    InvalidRadius { value: String },

    #[error("Isochrone request failed: {reason}")]
    FetchFailed { reason: String },

    #[error("Configuration invariant violated: {message}")]
    ConfigurationInvariantViolation { message: String },

    #[error("Unexpected response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Location,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRadius { .. } => ErrorCategory::Input,
            Self::LocationNotFound { .. } => ErrorCategory::Location,
            Self::FetchFailed { .. } | Self::InvalidResponse { .. } | Self::HttpError(_) => {
                ErrorCategory::Network
            }
            Self::ConfigurationInvariantViolation { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FetchFailed { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::InvalidResponse { .. } => ErrorSeverity::Medium,
            Self::InvalidRadius { .. } | Self::LocationNotFound { .. } => ErrorSeverity::High,
            Self::ConfigurationInvariantViolation { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// Message shown to whoever submitted the request.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::LocationNotFound { .. } => "Could not find the specified location.".to_string(),
            Self::InvalidRadius { .. } => "Please enter a valid number for the radius.".to_string(),
            Self::FetchFailed { .. } | Self::InvalidResponse { .. } | Self::HttpError(_) => {
                "Could not retrieve drive times from the routing service.".to_string()
            }
            Self::ConfigurationInvariantViolation { message } => {
                format!("The drive-time band configuration is inconsistent: {}", message)
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            Self::IoError(e) => format!("Could not write the map file: {}", e),
            Self::SerializationError(e) => format!("Could not encode map data: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::LocationNotFound { .. } => {
                "Check the spelling, or try a ZIP code instead of a city and state"
            }
            Self::InvalidRadius { .. } => "Enter the radius in miles as a plain number, e.g. 5 or 12.5",
            Self::FetchFailed { .. } | Self::InvalidResponse { .. } | Self::HttpError(_) => {
                "Check the OpenRouteService API key and network connectivity"
            }
            Self::ConfigurationInvariantViolation { .. } => {
                "Give every band exactly one color and list band minutes in increasing order"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration file and run again",
            Self::IoError(_) => "Check that the output directory exists and is writable",
            Self::SerializationError(_) => "Report this as a bug with the query that triggered it",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
