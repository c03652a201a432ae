//! Completion client
//!
//! The single entry point every stage uses to call a model. Transport
//! failures are folded into [`CompletionResult::Failure`] so a stage never
//! aborts because one model misbehaved.

use crate::config::CallProfile;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest};
use council_domain::{CompletionResult, Conversation, ModelKey, Temperature};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fail-soft, cost-accounting wrapper around a [`CompletionGateway`]
pub struct CompletionClient<G: CompletionGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: CompletionGateway + 'static> Clone for CompletionClient<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<G: CompletionGateway + 'static> CompletionClient<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Send one conversation to one model.
    ///
    /// Makes exactly one gateway call. Cost is derived from reported usage
    /// only; missing usage costs zero.
    pub async fn complete(
        &self,
        model: ModelKey,
        conversation: Conversation,
        temperature: Temperature,
        profile: CallProfile,
    ) -> CompletionResult {
        let spec = model.spec();
        let request = CompletionRequest::new(spec, conversation, temperature, profile);
        debug!(
            "Calling {} ({} chars, temperature {})",
            spec.name,
            request.conversation.char_len(),
            temperature.value()
        );

        let result = match self.gateway.complete(&request).await {
            Ok(response) => {
                let usage = response.usage.unwrap_or_default();
                let cost = spec.cost(&usage);
                info!(
                    "{} responded: {} in / {} out tokens, ${:.4}",
                    spec.name, usage.input_tokens, usage.output_tokens, cost
                );
                CompletionResult::Success {
                    model,
                    text: response.text,
                    usage,
                    cost,
                }
            }
            Err(e) => {
                warn!("{} failed: {}", spec.name, e);
                CompletionResult::Failure {
                    model,
                    error: e.to_string(),
                }
            }
        };

        self.logger.log(ConversationEvent::new(
            "completion",
            json!({
                "model": model.as_str(),
                "model_id": spec.id,
                "temperature": temperature.value(),
                "max_tokens": request.max_tokens,
                "messages": request.conversation.turns(),
                "success": !result.is_failure(),
                "response": result.text(),
                "cost": result.cost(),
            }),
        ));

        result
    }
}
