//! Progress notification port
//!
//! Defines the interface for reporting progress while the pipeline runs.

use council_domain::{ModelKey, Stage};

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts, with the number of model calls it makes
    fn on_stage_start(&self, stage: Stage, total_calls: usize);

    /// Called when one model call within a stage finishes
    fn on_call_complete(&self, stage: Stage, model: ModelKey, success: bool);

    /// Called when the stage has produced its output
    fn on_stage_complete(&self, stage: Stage, stage_cost: f64, total_cost: f64);

    /// Called while waiting on the code sandbox
    fn on_sandbox_start(&self) {}

    fn on_sandbox_complete(&self, _succeeded: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_calls: usize) {}
    fn on_call_complete(&self, _stage: Stage, _model: ModelKey, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage, _stage_cost: f64, _total_cost: f64) {}
}
