//! OpenRouter-compatible chat-completion adapter
//!
//! - [`protocol`]: wire types for `POST {base_url}/chat/completions`
//! - [`gateway`]: [`OpenRouterGateway`], the
//!   [`CompletionGateway`](council_application::CompletionGateway) implementation

pub mod gateway;
pub mod protocol;

pub use gateway::{GatewaySettings, OpenRouterGateway};
