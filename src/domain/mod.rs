// Domain layer: reading models and ports (interfaces).

pub mod model;
pub mod ports;
