// Domain layer: models, expiry rules and ports. No HTTP here.

pub mod expiry;
pub mod model;
pub mod ports;
