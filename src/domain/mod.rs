// Domain layer: backend resource models and the ports the rest of the crate depends on.

pub mod model;
pub mod ports;
