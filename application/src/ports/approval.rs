//! Approval gate port
//!
//! After every stage the pipeline stops and asks for a decision.
//!
//! # Flow
//!
//! ```text
//! Stage runs
//!     ↓
//! ApprovalPort::decide()
//!     ↓
//! Approve → next stage
//! Redo    → same stage again
//! Revise  → previous stage again
//! Restart → clear everything, back to the audit
//! Abort   → stop the run
//! ```
//!
//! # Built-in Implementations
//!
//! - [`AutoApprove`]: always approves, used for quick analysis mode
//!
//! For interactive use, see `InteractiveApproval` in the presentation layer.

use async_trait::async_trait;
use council_domain::{PipelineState, Stage};
use thiserror::Error;

/// What the human decided at a gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Continue, optionally with instructions for later stages
    Approve(Option<String>),
    Redo,
    Revise,
    /// Reset the pipeline; credentials are kept
    Restart,
    Abort,
}

impl ApprovalDecision {
    /// Short name recorded in the audit trail
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalDecision::Approve(_) => "approve",
            ApprovalDecision::Redo => "redo",
            ApprovalDecision::Revise => "revise",
            ApprovalDecision::Restart => "restart",
            ApprovalDecision::Abort => "abort",
        }
    }
}

/// Failures while asking, not decisions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for the human approval gate
#[async_trait]
pub trait ApprovalPort: Send + Sync {
    /// Ask for a decision on `stage`, whose output is already in `state`
    async fn decide(
        &self,
        stage: Stage,
        state: &PipelineState,
    ) -> Result<ApprovalDecision, ApprovalError>;
}

/// Approves every stage without asking
pub struct AutoApprove;

#[async_trait]
impl ApprovalPort for AutoApprove {
    async fn decide(
        &self,
        _stage: Stage,
        _state: &PipelineState,
    ) -> Result<ApprovalDecision, ApprovalError> {
        Ok(ApprovalDecision::Approve(None))
    }
}
