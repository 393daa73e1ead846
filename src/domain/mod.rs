// Domain layer: catalogs, booking model, raw submissions and ports (interfaces) for the
// render engine, template source and artifact store.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod submission;
