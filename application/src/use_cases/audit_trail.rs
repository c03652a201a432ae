//! Audit trail export
//!
//! A JSON record of what the run cost, what the council disagreed on and
//! every decision taken at an approval gate.

use chrono::{DateTime, Utc};
use council_domain::{Confidence, PipelineState, ResearchContext, Stage, StudyDesign};
use serde::Serialize;
use std::collections::BTreeMap;

/// One decision at an approval gate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    /// approve, redo, revise, restart or abort
    pub decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifications: Option<String>,
    /// What the stage had cost when the decision was taken
    pub stage_cost: f64,
}

impl DecisionRecord {
    pub fn new(stage: Stage, decision: &'static str, stage_cost: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            decision,
            modifications: None,
            stage_cost,
        }
    }

    pub fn with_modifications(mut self, modifications: Option<String>) -> Self {
        self.modifications = modifications.filter(|m| !m.trim().is_empty());
        self
    }
}

/// Snapshot of a run, written as `audit_trail.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditTrail {
    pub timestamp: DateTime<Utc>,
    pub total_cost: f64,
    pub stage_costs: BTreeMap<Stage, f64>,
    pub journal_format: String,
    pub study_design: StudyDesign,
    pub research_question: String,
    pub confidence_score: Option<Confidence>,
    pub council_disagreements: Option<String>,
    pub review_issues: Option<String>,
    pub decisions: Vec<DecisionRecord>,
}

impl AuditTrail {
    pub fn capture(
        state: &PipelineState,
        context: &ResearchContext,
        decisions: Vec<DecisionRecord>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            total_cost: state.total_cost(),
            stage_costs: state.ledger().breakdown().clone(),
            journal_format: context.journal_format().name.to_string(),
            study_design: context.study_design,
            research_question: context.research_question.clone(),
            confidence_score: state.review().map(|r| r.confidence),
            council_disagreements: state.planning().and_then(|p| p.disagreements.clone()),
            review_issues: state.review().and_then(|r| r.issues.clone()),
            decisions,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        AuditResult, Credentials, PipelineEvent, PlanningResult, StageOutput,
    };

    fn state_after_planning() -> PipelineState {
        PipelineState::new(Credentials::new(Some("k".into()), None))
            .apply(PipelineEvent::StageCompleted(StageOutput::Audit(AuditResult {
                report: "ok".into(),
                cost: 0.01,
            })))
            .unwrap()
            .apply(PipelineEvent::Approve(None))
            .unwrap()
            .apply(PipelineEvent::StageCompleted(StageOutput::Planning(PlanningResult {
                proposals: vec![],
                synthesis: "plan".into(),
                synthesis_failed: false,
                disagreements: Some("CONFLICT on splines".into()),
                cost: 0.5,
            })))
            .unwrap()
    }

    #[test]
    fn test_capture_reads_state() {
        let context = ResearchContext::new("Does BMI matter?", "complication", "bmi")
            .with_journal("jbjs");
        let decisions = vec![DecisionRecord::new(Stage::Audit, "approve", 0.01)];
        let trail = AuditTrail::capture(&state_after_planning(), &context, decisions, Utc::now());

        assert!((trail.total_cost - 0.51).abs() < 1e-12);
        assert_eq!(trail.stage_costs.len(), 2);
        assert_eq!(trail.journal_format, "Journal of Bone and Joint Surgery");
        assert_eq!(trail.council_disagreements.as_deref(), Some("CONFLICT on splines"));
        assert_eq!(trail.confidence_score, None);
        assert_eq!(trail.decisions.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let context = ResearchContext::new("q", "y", "x");
        let decisions = vec![
            DecisionRecord::new(Stage::Planning, "approve", 0.5)
                .with_modifications(Some("Add age splines".into())),
            DecisionRecord::new(Stage::Audit, "redo", 0.01).with_modifications(Some("  ".into())),
        ];
        let trail = AuditTrail::capture(&state_after_planning(), &context, decisions, Utc::now());
        let value: serde_json::Value = serde_json::from_str(&trail.to_json().unwrap()).unwrap();

        assert_eq!(value["stage_costs"]["planning"], 0.5);
        assert_eq!(value["study_design"], "Auto-detect");
        assert_eq!(value["review_issues"], serde_json::Value::Null);
        assert_eq!(value["decisions"][0]["modifications"], "Add age splines");
        assert!(value["decisions"][1].get("modifications").is_none());
    }
}
