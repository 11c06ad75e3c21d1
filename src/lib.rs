// triage-rs: configuration layering, output writers and sweeps around the simulator

pub mod config;
pub mod output;
pub mod sweep;

pub use triage_shared as shared;
pub use triage_simulator as simulator;
