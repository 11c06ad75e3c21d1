//! # Layered configuration
//!
//! The effective configuration is assembled from, lowest precedence first:
//!
//! 1. built-in defaults (`Config::default()`),
//! 2. an optional TOML file (`--config triage.toml`),
//! 3. environment variables such as `TRIAGE__EMERGENCY__ROOMS=2`,
//! 4. `--param key=value` overrides such as `service.red=45`.
//!
//! The merged result is validated before it is returned.

use ::config as config_rs;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub use triage_shared::config::*;

const ENV_PREFIX: &str = "TRIAGE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Config source error: {0}")]
    Source(#[from] config_rs::ConfigError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Load defaults, `path`, `TRIAGE__*` environment variables, then `overrides`.
pub fn load_layered(path: Option<&Path>, overrides: &[(String, String)]) -> Result<Config, LoadError> {
    build(path, environment(None), overrides)
}

fn environment(vars: Option<HashMap<String, String>>) -> config_rs::Environment {
    config_rs::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(vars)
}

fn build(
    path: Option<&Path>,
    env: config_rs::Environment,
    overrides: &[(String, String)],
) -> Result<Config, LoadError> {
    let mut builder = config_rs::Config::builder().add_source(config_rs::Config::try_from(&Config::default())?);
    if let Some(path) = path {
        tracing::info!("Loading configuration from: {}", path.display());
        builder = builder.add_source(
            config_rs::File::from(path)
                .format(config_rs::FileFormat::Toml)
                .required(true),
        );
    }
    builder = builder.add_source(env);
    for (key, value) in overrides {
        tracing::debug!("Override param: {}={}", key, value);
        builder = builder.set_override(key.as_str(), value.as_str())?;
    }
    let config: Config = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env() -> config_rs::Environment {
        environment(Some(HashMap::new()))
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = build(None, no_env(), &[]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_then_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("triage.toml");
        std::fs::write(&path, "[emergency]\nrooms = 1\npatients = 10\n\n[service]\nred = 45\n").unwrap();
        let overrides = vec![("emergency.patients".to_string(), "20".to_string())];
        let config = build(Some(&path), no_env(), &overrides).unwrap();
        assert_eq!(config.emergency.rooms, 1);
        assert_eq!(config.emergency.patients, 20);
        assert_eq!(config.service.red, 45);
        assert_eq!(config.service.white, 10);
    }

    #[test]
    fn test_environment_layer() {
        let mut vars = HashMap::new();
        vars.insert("TRIAGE__EMERGENCY__ROOMS".to_string(), "5".to_string());
        vars.insert("TRIAGE__TIMEOUT__WHITE".to_string(), "90".to_string());
        let config = build(None, environment(Some(vars)), &[]).unwrap();
        assert_eq!(config.emergency.rooms, 5);
        assert_eq!(config.timeout.white, 90);
    }

    #[test]
    fn test_override_beats_environment() {
        let mut vars = HashMap::new();
        vars.insert("TRIAGE__EMERGENCY__ROOMS".to_string(), "5".to_string());
        let overrides = vec![("emergency.rooms".to_string(), "2".to_string())];
        let config = build(None, environment(Some(vars)), &overrides).unwrap();
        assert_eq!(config.emergency.rooms, 2);
    }

    #[test]
    fn test_time_of_day_override() {
        let overrides = vec![("emergency.end_time".to_string(), "12:00".to_string())];
        let config = build(None, no_env(), &overrides).unwrap();
        assert_eq!(config.end(), triage_shared::SimTime::from_hm(12, 0));
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        let overrides = vec![("emergency.rooms".to_string(), "0".to_string())];
        let err = build(None, no_env(), &overrides).unwrap_err();
        assert!(matches!(err, LoadError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = build(Some(Path::new("does/not/exist.toml")), no_env(), &[]).unwrap_err();
        assert!(matches!(err, LoadError::Source(_)));
    }
}
