//! Completion endpoint configuration from TOML (`[gateway]` section)

use super::ConfigError;
use council_application::CouncilConfig;
use serde::{Deserialize, Serialize};

/// Endpoint location, attribution headers and per-call limits
///
/// ```toml
/// [gateway]
/// base_url = "https://openrouter.ai/api/v1"
/// referer = "https://example.org"
/// title = "Stats Council"
/// standard_timeout_seconds = 120
/// writing_timeout_seconds = 180
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub base_url: String,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub standard_timeout_seconds: u64,
    pub standard_max_tokens: u32,
    pub writing_timeout_seconds: u64,
    pub writing_max_tokens: u32,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: crate::openrouter::gateway::DEFAULT_BASE_URL.to_string(),
            referer: None,
            title: Some("Stats Council".to_string()),
            standard_timeout_seconds: 120,
            standard_max_tokens: 4096,
            writing_timeout_seconds: 180,
            writing_max_tokens: 8192,
        }
    }
}

impl FileGatewayConfig {
    pub(super) fn apply(&self, config: &mut CouncilConfig) -> Result<(), ConfigError> {
        if self.standard_timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout(
                "gateway.standard_timeout_seconds".to_string(),
            ));
        }
        if self.writing_timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout(
                "gateway.writing_timeout_seconds".to_string(),
            ));
        }
        config.standard_call = config
            .standard_call
            .with_timeout_seconds(self.standard_timeout_seconds)
            .with_max_tokens(self.standard_max_tokens);
        config.writing_call = config
            .writing_call
            .with_timeout_seconds(self.writing_timeout_seconds)
            .with_max_tokens(self.writing_max_tokens);
        Ok(())
    }

    pub fn settings(&self) -> crate::openrouter::GatewaySettings {
        crate::openrouter::GatewaySettings {
            base_url: self.base_url.clone(),
            referer: self.referer.clone(),
            title: self.title.clone(),
        }
    }
}
