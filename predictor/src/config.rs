//! Configuration for the stress prediction service
//!
//! Defaults in code, then `config/predictor-<environment>` if present, then
//! environment variables with the PREDICTOR__ prefix.

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub environment: String,

    /// Log output: "pretty" or "json"
    pub log_format: String,

    pub server: ServerConfig,

    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Directory holding `X_train.csv` and `feature_columns.json`
    pub artifact_dir: PathBuf,

    /// Base URL of the model inference server
    pub inference_endpoint: String,

    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PREDICTOR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("log_format", "pretty")?
            .set_default("server.port", 8001)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("model.artifact_dir", "models")?
            .set_default("model.inference_endpoint", "http://localhost:8501")?
            .set_default("model.timeout_secs", 10)?
            .add_source(
                File::with_name(&format!("config/predictor-{}", environment)).required(false),
            )
            .add_source(
                Environment::with_prefix("PREDICTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
