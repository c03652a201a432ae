//! Domain layer for stats-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! Several models are consulted per stage. Their answers are kept apart,
//! attributed by model, and merged by a synthesizing model or by plain
//! concatenation, depending on the stage.
//!
//! ## Pipeline
//!
//! Six stages run in a fixed order, each behind a human approval gate:
//!
//! - **Audit**: data quality review
//! - **Planning**: three proposals plus a synthesis
//! - **Assumptions**: statistical assumption checks
//! - **Execution**: code generation, verification and sandbox run
//! - **Review**: two adversarial reviews
//! - **Writing**: manuscript sections and document rendering
//!
//! State moves only through [`PipelineState::apply`], which enforces the
//! gates and keeps the cost ledger additive.

pub mod conversation;
pub mod core;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod study;

// Re-export commonly used types
pub use conversation::{CompletionResult, Conversation, ConversationTurn, Role, Temperature, TokenUsage};
pub use core::{
    error::DomainError,
    model::{MODEL_REGISTRY, ModelKey, ModelSpec},
};
pub use extract::{
    Confidence, assess_review, classify_confidence, count_vocabulary, extract_code_block,
    extract_disagreements, extract_issues, verification_flags_problem,
};
pub use pipeline::{
    AssumptionsResult, AuditResult, CostLedger, Credentials, DocumentArtifact, ExecutionOutput,
    ExecutionResult, ManuscriptSections, PipelineError, PipelineEvent, PipelineState,
    PlanningResult, Proposal, ReviewResult, Stage, StageOutput, WritingResult,
};
pub use prompt::{PromptTemplate, WritingInputs};
pub use study::{
    AnalysisMode, ColumnKind, ColumnProfile, DataTable, DatasetProfile, JournalFormat,
    ResearchContext, StudyDesign,
};
