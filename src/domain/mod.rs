// Domain layer: core models, exchange rates and ports (interfaces).

pub mod model;
pub mod ports;
pub mod rates;
