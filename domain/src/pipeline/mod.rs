//! Pipeline domain
//!
//! The six-stage workflow as explicit state. [`PipelineState::apply`] is the
//! only way to move between stages, so approval gates and cost accounting
//! hold regardless of which driver runs the pipeline.

mod credentials;
mod error;
mod ledger;
mod outputs;
mod stage;
mod state;

pub use credentials::Credentials;
pub use error::PipelineError;
pub use ledger::CostLedger;
pub use outputs::{
    AssumptionsResult, AuditResult, DocumentArtifact, ExecutionOutput, ExecutionResult,
    ManuscriptSections, PlanningResult, Proposal, ReviewResult, StageOutput, WritingResult,
};
pub use stage::Stage;
pub use state::{PipelineEvent, PipelineState};
