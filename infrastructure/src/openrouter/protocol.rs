//! Wire types for the chat-completion endpoint.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! response body is ignored.

use council_domain::{Conversation, Role, TokenUsage};
use serde::{Deserialize, Deserializer, Serialize};

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One message in the request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, conversation: &'a Conversation, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            messages: conversation
                .turns()
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role,
                    content: &turn.content,
                })
                .collect(),
            temperature,
            max_tokens,
        }
    }
}

/// Response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// `None` when absent or unreadable; the content is kept either way
    #[serde(default, deserialize_with = "lenient_usage")]
    pub usage: Option<Usage>,
}

/// Malformed usage (nulls, strings, negative counts) reads as no usage
fn lenient_usage<'de, D>(deserializer: D) -> Result<Option<Usage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// Token counts as the endpoint reports them
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        TokenUsage::new(usage.prompt_tokens, usage.completion_tokens)
    }
}

impl ChatResponse {
    /// Content of the first choice, if there is one
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let conversation = Conversation::system_user("be terse", "hello");
        let request = ChatRequest::new("openai/o3", &conversation, 0.1, 4096);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "openai/o3");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
        assert_eq!(value["max_tokens"], 4096);
        assert!((value["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_response_without_usage() {
        let body = r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"hi"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content(), Some("hi"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_malformed_usage_keeps_content() {
        for usage in [
            r#"{"prompt_tokens":null,"completion_tokens":12}"#,
            r#"{"prompt_tokens":"many","completion_tokens":12}"#,
            r#"{"prompt_tokens":-3,"completion_tokens":12}"#,
            r#""n/a""#,
            "null",
        ] {
            let body = format!(r#"{{"choices":[{{"message":{{"content":"plan"}}}}],"usage":{usage}}}"#);
            let response: ChatResponse = serde_json::from_str(&body).unwrap();
            assert_eq!(response.first_content(), Some("plan"));
            assert!(response.usage.is_none(), "usage {usage} should be dropped");
        }
    }

    #[test]
    fn test_null_content_is_none() {
        let body = r#"{"choices":[{"message":{"content":null}}],"usage":{"prompt_tokens":5}}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content(), None);
        let usage: TokenUsage = response.usage.unwrap().into();
        assert_eq!(usage, TokenUsage::new(5, 0));
    }
}
