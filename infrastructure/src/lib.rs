//! Infrastructure layer for stats-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration and dataset loading.

pub mod config;
pub mod dataset;
pub mod document;
pub mod logging;
pub mod openrouter;
pub mod sandbox;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use dataset::{DatasetError, load_dataset};
pub use document::PandocRenderer;
pub use logging::JsonlConversationLogger;
pub use openrouter::{GatewaySettings, OpenRouterGateway};
pub use sandbox::{LocalPythonExecutor, SandboxSettings};
