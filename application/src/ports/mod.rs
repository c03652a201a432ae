//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod approval;
pub mod code_executor;
pub mod conversation_logger;
pub mod document_renderer;
pub mod llm_gateway;
pub mod progress;
