//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown model key: {0}")]
    UnknownModel(String),

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("Temperature {0} is outside [0, 2]")]
    InvalidTemperature(f32),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("Unknown study design: {0}")]
    UnknownStudyDesign(String),

    #[error("Unknown analysis mode: {0} (expected full or quick)")]
    UnknownAnalysisMode(String),
}

impl DomainError {
    /// Check if this error means a credential must be configured before running
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, DomainError::MissingCredential(_))
    }
}
