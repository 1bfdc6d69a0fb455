// Domain layer: triage models and the ports for external collaborators.

pub mod model;
pub mod ports;
