//! Transcript port
//!
//! Every completion call and every gate decision of a run is recorded as one
//! event. `tracing` carries the diagnostics; this port carries the replayable
//! record of what each model was asked and answered.

use super::approval::ApprovalDecision;
use council_domain::Stage;
use serde_json::{Value, json};

/// One transcript entry: a kind tag plus kind-specific JSON fields
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// "completion", "stage_completed" or "decision"
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    /// Timestamps are added by the adapter.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn stage_completed(stage: Stage, stage_cost: f64, total_cost: f64) -> Self {
        Self::new(
            "stage_completed",
            json!({
                "stage": stage.as_str(),
                "cost": stage_cost,
                "total_cost": total_cost,
            }),
        )
    }

    pub fn decision(stage: Stage, decision: &ApprovalDecision) -> Self {
        let modifications = match decision {
            ApprovalDecision::Approve(notes) => notes.clone(),
            _ => None,
        };
        Self::new(
            "decision",
            json!({
                "stage": stage.as_str(),
                "decision": decision.as_str(),
                "modifications": modifications,
            }),
        )
    }
}

/// Sink for transcript events
///
/// Never fails and never blocks the run for long; adapters swallow their
/// own write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
