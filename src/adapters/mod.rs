// Adapters layer: concrete implementations of the domain ports.

pub mod nominatim;
pub mod openroute;
pub mod storage;

pub use nominatim::NominatimGeocoder;
pub use openroute::OpenRouteServiceClient;
pub use storage::LocalStorage;
