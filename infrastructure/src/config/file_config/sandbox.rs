//! Sandbox configuration from TOML (`[sandbox]` section)

use super::ConfigError;
use crate::sandbox::SandboxSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSandboxConfig {
    /// Interpreter used to run `analysis.py`
    pub python: String,
    pub timeout_seconds: u64,
    /// USD charged per successful run
    pub cost_estimate: f64,
}

impl Default for FileSandboxConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            timeout_seconds: 300,
            cost_estimate: 0.0,
        }
    }
}

impl FileSandboxConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout("sandbox.timeout_seconds".to_string()));
        }
        Ok(Duration::from_secs(self.timeout_seconds))
    }

    pub fn settings(&self) -> Result<SandboxSettings, ConfigError> {
        Ok(SandboxSettings {
            python: self.python.clone(),
            timeout: self.timeout()?,
            cost_estimate: self.cost_estimate.max(0.0),
        })
    }
}
