use super::stage::Stage;
use thiserror::Error;

/// Rejected pipeline transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{stage} cannot start: {missing} has no output")]
    StageNotReady { stage: Stage, missing: Stage },

    #[error("{stage} cannot start: {requires} has not been approved")]
    NotApproved { stage: Stage, requires: Stage },

    #[error("{requested} is not the current stage (current: {current})")]
    OutOfOrder { current: Stage, requested: Stage },

    #[error("Pipeline is already complete")]
    AlreadyComplete,

    #[error("Nothing to revise before {0}")]
    NothingToRevise(Stage),

    #[error("Output for {got} recorded while {expected} is current")]
    OutputMismatch { expected: Stage, got: Stage },

    #[error("{0} has no output to approve")]
    NoOutput(Stage),
}
