use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

pub const DEFAULT_ERROR_LOG_PATH: &str = "errors.log";
pub const DEFAULT_PERSISTENCE_FAILURE_RATE: f64 = 0.3;

/// User registry configuration
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Append-only error log, relative to the working directory by default
    pub error_log_path: PathBuf,
    /// Probability in [0, 1] that the simulated save step fails
    pub persistence_failure_rate: f64,
}

impl RegistryConfig {
    pub fn new(error_log_path: impl Into<PathBuf>, persistence_failure_rate: f64) -> Self {
        Self {
            error_log_path: error_log_path.into(),
            persistence_failure_rate,
        }
    }
}

impl FromEnv for RegistryConfig {
    /// Reads from environment variables with defaults:
    /// - ERROR_LOG_PATH: defaults to `errors.log`
    /// - PERSISTENCE_FAILURE_RATE: defaults to 0.3, must lie in [0, 1]
    fn from_env() -> Result<Self, ConfigError> {
        let error_log_path = env_or_default("ERROR_LOG_PATH", DEFAULT_ERROR_LOG_PATH);
        let persistence_failure_rate =
            env_parse_or_default("PERSISTENCE_FAILURE_RATE", DEFAULT_PERSISTENCE_FAILURE_RATE)?;

        if !(0.0..=1.0).contains(&persistence_failure_rate) {
            return Err(ConfigError::ParseError {
                key: "PERSISTENCE_FAILURE_RATE".to_string(),
                details: format!("{} is outside [0, 1]", persistence_failure_rate),
            });
        }

        Ok(Self::new(error_log_path, persistence_failure_rate))
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG_PATH, DEFAULT_PERSISTENCE_FAILURE_RATE)
    }
}
