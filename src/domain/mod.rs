// Domain layer: the request/template models and the builder/prototype ports.

pub mod model;
pub mod ports;
