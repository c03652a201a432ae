//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Model names and temperatures stay as raw strings and numbers here and are
//! checked when converted into [`CouncilConfig`].

mod gateway;
mod models;
mod output;
mod sandbox;

pub use gateway::FileGatewayConfig;
pub use models::{FileModelsConfig, FileTemperaturesConfig};
pub use output::FileOutputConfig;
pub use sandbox::FileSandboxConfig;

use council_application::CouncilConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("models.{field}: unknown model '{value}'")]
    UnknownModel { field: String, value: String },

    #[error("models.{0}: list cannot be empty")]
    EmptyModelList(String),

    #[error("models.{field}: '{value}' is listed more than once")]
    DuplicateModel { field: String, value: String },

    #[error("temperatures.{field}: {value} is outside [0, 2]")]
    InvalidTemperature { field: String, value: f32 },

    #[error("{0} cannot be 0")]
    InvalidTimeout(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Stage-to-model assignment
    pub models: FileModelsConfig,
    /// Sampling temperatures per stage family
    pub temperatures: FileTemperaturesConfig,
    /// Completion endpoint and per-call limits
    pub gateway: FileGatewayConfig,
    /// Code execution sandbox
    pub sandbox: FileSandboxConfig,
    /// Output directory and run defaults
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Resolve into the application's [`CouncilConfig`], starting from its
    /// defaults and overriding whatever the file sets.
    pub fn to_council_config(&self) -> Result<CouncilConfig, ConfigError> {
        let mut config = CouncilConfig::default();
        self.models.apply(&mut config)?;
        self.temperatures.apply(&mut config)?;
        self.gateway.apply(&mut config)?;
        // The sandbox takes its settings directly; only validated here
        self.sandbox.timeout()?;
        Ok(config)
    }
}
