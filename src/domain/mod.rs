// Domain layer: pipeline values and the ports external systems plug into.

pub mod artifact;
pub mod bands;
pub mod model;
pub mod ports;
