//! Configuration for the user registry

use core_config::registry::RegistryConfig;
use core_config::{Environment, FromEnv};
use eyre::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub registry: RegistryConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            environment: Environment::from_env(),
            registry: RegistryConfig::from_env()?,
        })
    }
}
