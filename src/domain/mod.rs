// Domain layer: core models, ports and demo data. No I/O here.

pub mod model;
pub mod ports;
pub mod seed;
