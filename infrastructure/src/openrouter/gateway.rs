//! HTTP gateway for OpenRouter-compatible endpoints.

use super::protocol::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use council_application::ports::llm_gateway::{
    CompletionGateway, CompletionRequest, GatewayError, GatewayResponse,
};
use council_domain::core::string::truncate;
use std::time::Duration;
use tracing::{debug, trace};

/// Default OpenRouter API root
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Error bodies are cut to this many bytes before they reach logs
const ERROR_BODY_LIMIT: usize = 500;

/// Endpoint location and attribution headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub base_url: String,
    /// Sent as `HTTP-Referer`
    pub referer: Option<String>,
    /// Sent as `X-Title`
    pub title: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: None,
            title: None,
        }
    }
}

/// [`CompletionGateway`] over `POST {base_url}/chat/completions`
///
/// Each call is one HTTP round trip with the request's own timeout.
pub struct OpenRouterGateway {
    client: reqwest::Client,
    api_key: String,
    settings: GatewaySettings,
}

impl OpenRouterGateway {
    pub fn new(api_key: impl Into<String>, settings: GatewaySettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<GatewayResponse, GatewayError> {
        let body = ChatRequest::new(
            request.model.id,
            &request.conversation,
            request.temperature.value(),
            request.max_tokens,
        );

        let mut builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body);
        if let Some(referer) = &self.settings.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.settings.title {
            builder = builder.header("X-Title", title);
        }

        debug!("POST {} model={}", self.endpoint(), request.model.id);
        let response = builder
            .send()
            .await
            .map_err(|e| map_transport(e, request.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_transport(e, request.timeout))?;
        trace!("Response body ({} bytes)", text.len());

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate(&text, ERROR_BODY_LIMIT),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        let content = parsed.first_content().ok_or_else(|| {
            GatewayError::MalformedResponse("response has no message content".to_string())
        })?;

        Ok(GatewayResponse {
            text: content.to_string(),
            usage: parsed.usage.map(Into::into),
        })
    }
}

fn map_transport(error: reqwest::Error, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Transport(error.to_string())
    }
}
