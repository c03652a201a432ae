//! Configuration file loading for stats-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STATS_COUNCIL_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml`
//! 4. Global: `~/.config/stats-council/config.toml`
//! 5. Default values
//!
//! API keys are never read from these files; they come from
//! `OPENROUTER_API_KEY` and `OPENAI_API_KEY`.

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, FileConfig, FileGatewayConfig, FileModelsConfig, FileOutputConfig,
    FileSandboxConfig, FileTemperaturesConfig,
};
pub use loader::ConfigLoader;
