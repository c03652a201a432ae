//! Completion results and token usage

use crate::core::model::ModelKey;
use serde::{Deserialize, Serialize};

/// Token counters reported by the endpoint
///
/// Absent counters default to zero, which yields zero cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Outcome of a single completion call
///
/// Transport failures are a distinct variant so they can never be mistaken
/// for genuine model output. [`CompletionResult::text`] still renders a
/// human-readable error for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionResult {
    Success {
        model: ModelKey,
        text: String,
        usage: TokenUsage,
        cost: f64,
    },
    Failure {
        model: ModelKey,
        error: String,
    },
}

impl CompletionResult {
    pub fn model(&self) -> ModelKey {
        match self {
            CompletionResult::Success { model, .. } | CompletionResult::Failure { model, .. } => {
                *model
            }
        }
    }

    /// Generated text on success, `"Error calling <model>: <error>"` on failure
    pub fn text(&self) -> String {
        match self {
            CompletionResult::Success { text, .. } => text.clone(),
            CompletionResult::Failure { model, error } => {
                format!("Error calling {}: {}", model.display_name(), error)
            }
        }
    }

    /// Generated text only when the call succeeded
    pub fn content(&self) -> Option<&str> {
        match self {
            CompletionResult::Success { text, .. } => Some(text),
            CompletionResult::Failure { .. } => None,
        }
    }

    /// Cost in USD; always zero for failures
    pub fn cost(&self) -> f64 {
        match self {
            CompletionResult::Success { cost, .. } => *cost,
            CompletionResult::Failure { .. } => 0.0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CompletionResult::Failure { .. })
    }
}
