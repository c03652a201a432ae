//! Application layer for stats-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CallProfile, CouncilConfig};
pub use ports::{
    approval::{ApprovalDecision, ApprovalError, ApprovalPort, AutoApprove},
    code_executor::CodeExecutorPort,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_renderer::{DocumentRenderer, PlainTextRenderer},
    llm_gateway::{CompletionGateway, CompletionRequest, GatewayError, GatewayResponse},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::audit_trail::{AuditTrail, DecisionRecord};
pub use use_cases::completion_client::CompletionClient;
pub use use_cases::orchestrator::{StageOrchestrator, StudyInputs};
pub use use_cases::run_pipeline::{
    RunPipelineError, RunPipelineInput, RunPipelineOutput, RunPipelineUseCase,
};
