//! # Emergency Department Configuration
//!
//! Tunable parameters for a simulation run: room count, patient count, the
//! operating window, and per-color service and waiting timeouts. Every
//! duration is written in minutes of simulated time.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [emergency]
//! rooms = 2
//! patients = 60
//! start_time = "09:00"
//! end_time = "17:30"
//!
//! [service]
//! red = 45
//!
//! [timeout]
//! white = 90
//! ```
//!
//! Any field left out keeps its default (3 rooms, 120 patients, 08:00-20:00,
//! service 10/15/30, timeouts 60/30/30).
//!
//! ## Example: Rust Usage
//!
//! ```rust
//! use triage_shared::config::Config;
//! let toml_str = r#"
//! [emergency]
//! rooms = 2
//!
//! [service]
//! red = 45
//! "#;
//! let config: Config = toml::from_str(toml_str).unwrap();
//! assert_eq!(config.emergency.rooms, 2);
//! assert_eq!(config.service.red, 45);
//! assert_eq!(config.service.white, 10);
//! assert!(config.validate().is_ok());
//! ```

use crate::patient::ColorCode;
use crate::time::SimTime;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration: the department, service times, and waiting timeouts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub emergency: EmergencyConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub timeout: TimeoutConfig,
}

/// Department-level parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmergencyConfig {
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    #[serde(default = "default_patients")]
    pub patients: u32,
    /// Minutes between two consecutive arrivals.
    #[serde(default = "default_arrival_interval")]
    pub arrival_interval: u64,
    #[serde(default = "default_triage_duration")]
    pub triage_duration: u64,
    /// Minutes between two room polls.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: u64,
    #[serde(default = "default_start_time", with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(default = "default_end_time", with = "hhmm")]
    pub end_time: NaiveTime,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            patients: default_patients(),
            arrival_interval: default_arrival_interval(),
            triage_duration: default_triage_duration(),
            tick_interval: default_tick_interval(),
            start_time: default_start_time(),
            end_time: default_end_time(),
        }
    }
}

/// Minutes a patient occupies a room, by the color held on admission.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_white")]
    pub white: u64,
    #[serde(default = "default_service_yellow")]
    pub yellow: u64,
    #[serde(default = "default_service_red")]
    pub red: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            white: default_service_white(),
            yellow: default_service_yellow(),
            red: default_service_red(),
        }
    }
}

/// Minutes a patient may wait with a given color before it times out.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_timeout_white")]
    pub white: u64,
    #[serde(default = "default_timeout_yellow")]
    pub yellow: u64,
    #[serde(default = "default_timeout_red")]
    pub red: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            white: default_timeout_white(),
            yellow: default_timeout_yellow(),
            red: default_timeout_red(),
        }
    }
}

impl Config {
    /// Reject configurations the engine cannot run consistently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.emergency;
        if e.rooms == 0 {
            return Err(ConfigError::Invalid("room count must be > 0".to_string()));
        }
        let minutes = [
            ("emergency.arrival_interval", e.arrival_interval),
            ("emergency.triage_duration", e.triage_duration),
            ("emergency.tick_interval", e.tick_interval),
            ("service.white", self.service.white),
            ("service.yellow", self.service.yellow),
            ("service.red", self.service.red),
            ("timeout.white", self.timeout.white),
            ("timeout.yellow", self.timeout.yellow),
            ("timeout.red", self.timeout.red),
        ];
        for (key, value) in minutes {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0 minutes", key)));
            }
            if value > MAX_MINUTES {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at most {} minutes, got {}",
                    key, MAX_MINUTES, value
                )));
            }
        }
        if e.end_time <= e.start_time {
            return Err(ConfigError::Invalid(format!(
                "end_time {} must be after start_time {}",
                e.end_time.format("%H:%M"),
                e.start_time.format("%H:%M")
            )));
        }
        Ok(())
    }

    pub fn start(&self) -> SimTime {
        SimTime::from(self.emergency.start_time)
    }

    pub fn end(&self) -> SimTime {
        SimTime::from(self.emergency.end_time)
    }

    pub fn arrival_interval(&self) -> Duration {
        minutes(self.emergency.arrival_interval)
    }

    pub fn triage_duration(&self) -> Duration {
        minutes(self.emergency.triage_duration)
    }

    pub fn tick_interval(&self) -> Duration {
        minutes(self.emergency.tick_interval)
    }

    /// Room occupancy for a patient admitted with `color`.
    pub fn service_duration(&self, color: ColorCode) -> Option<Duration> {
        match color {
            ColorCode::White => Some(minutes(self.service.white)),
            ColorCode::Yellow => Some(minutes(self.service.yellow)),
            ColorCode::Red => Some(minutes(self.service.red)),
            _ => None,
        }
    }

    /// Waiting allowance for a patient currently holding `color`.
    pub fn timeout(&self, color: ColorCode) -> Option<Duration> {
        match color {
            ColorCode::White => Some(minutes(self.timeout.white)),
            ColorCode::Yellow => Some(minutes(self.timeout.yellow)),
            ColorCode::Red => Some(minutes(self.timeout.red)),
            _ => None,
        }
    }
}

/// Upper bound for every duration or interval setting: one week.
pub const MAX_MINUTES: u64 = 7 * 24 * 60;

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

// Default value functions
fn default_rooms() -> u32 { 3 }
fn default_patients() -> u32 { 120 }
fn default_arrival_interval() -> u64 { 5 }
fn default_triage_duration() -> u64 { 5 }
fn default_tick_interval() -> u64 { 5 }
fn default_start_time() -> NaiveTime { NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN) }
fn default_end_time() -> NaiveTime { NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN) }
fn default_service_white() -> u64 { 10 }
fn default_service_yellow() -> u64 { 15 }
fn default_service_red() -> u64 { 30 }
fn default_timeout_white() -> u64 { 60 }
fn default_timeout_yellow() -> u64 { 30 }
fn default_timeout_red() -> u64 { 30 }

/// Times of day are written "HH:MM" in config files.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(s.trim(), FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid time of day '{}': {}", s, e)))
    }
}

/// Load and validate configuration from a TOML file at the given path.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config: Config = match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                return Err(ConfigError::Toml(e));
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path.display(), e);
            return Err(ConfigError::Io(e));
        }
    };
    config.validate()?;
    Ok(config)
}
