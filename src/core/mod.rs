pub mod composer;
pub mod engine;
pub mod fetcher;
pub mod render;
pub mod request;
pub mod resolver;

pub use composer::MapComposer;
pub use engine::MapEngine;
pub use fetcher::IsochroneFetcher;
pub use request::{MapForm, MapRequest};
pub use resolver::LocationResolver;
