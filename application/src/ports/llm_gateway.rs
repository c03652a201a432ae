//! Completion gateway port
//!
//! Defines the interface for sending one conversation to a remote
//! chat-completion endpoint.

use crate::config::CallProfile;
use async_trait::async_trait;
use council_domain::{Conversation, ModelSpec, Temperature, TokenUsage};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a completion round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// One request to the endpoint
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: &'static ModelSpec,
    pub conversation: Conversation,
    pub temperature: Temperature,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CompletionRequest {
    pub fn new(
        model: &'static ModelSpec,
        conversation: Conversation,
        temperature: Temperature,
        profile: CallProfile,
    ) -> Self {
        Self {
            model,
            conversation,
            temperature,
            max_tokens: profile.max_tokens,
            timeout: profile.timeout,
        }
    }
}

/// Raw endpoint reply
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub text: String,
    /// Absent when the endpoint reported no usage block
    pub usage: Option<TokenUsage>,
}

/// Gateway for chat completions
///
/// One call is one HTTP round trip. Implementations never retry.
/// Adapters live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<GatewayResponse, GatewayError>;
}
