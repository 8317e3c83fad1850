pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
pub use crate::adapters::{LocalStorage, NominatimGeocoder, OpenRouteServiceClient};
pub use crate::config::{LogFormat, MapConfig};
pub use crate::core::{MapComposer, MapEngine, MapForm, MapRequest};
pub use crate::domain::bands::{BandScheme, BandStyle};
pub use crate::domain::model::{Coordinate, FetchOutcome, MapReport, Resolution};
pub use crate::utils::error::{MapError, Result};
