//! Conversation domain
//!
//! The request side of a completion call ([`Conversation`], [`Temperature`])
//! and the result side ([`CompletionResult`], [`TokenUsage`]).

mod completion;
mod entities;

pub use completion::{CompletionResult, TokenUsage};
pub use entities::{Conversation, ConversationTurn, Role, Temperature};
