// triage_shared: shared types for the simulator, the CLI, and tests

pub mod config;
pub mod patient;
pub mod time;

pub use config::{Config, ConfigError, EmergencyConfig, ServiceConfig, TimeoutConfig, load_config};
pub use patient::{ColorCode, Patient, PatientId};
pub use time::SimTime;
