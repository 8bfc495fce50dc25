// Domain layer: flow model, errors and the ports the pipeline talks through.

pub mod model;
pub mod ports;
