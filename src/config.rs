//! Configuration management for the Biblioteca client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the Biblioteca REST backend, including the `/api` prefix.
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the durable client state (session, offline users,
    /// pending repairs).
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration (optional: the client may run
            // far away from any config directory)
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix BIBLIOTECA_)
            .add_source(
                Environment::with_prefix("BIBLIOTECA")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override API base URL from BIBLIOTECA_API_URL env var if present
            .set_override_option(
                "api.base_url",
                env::var("BIBLIOTECA_API_URL").ok(),
            )?
            // Override data directory from BIBLIOTECA_DATA_DIR env var if present
            .set_override_option(
                "storage.data_dir",
                env::var("BIBLIOTECA_DATA_DIR").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001/api".to_string(),
            timeout_seconds: 30,
            user_agent: "biblioteca-client/1.0".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            data_dir: format!("{}/.local/share/biblioteca", home),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
