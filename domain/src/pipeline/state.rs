//! Pipeline state and its pure transitions

use super::credentials::Credentials;
use super::error::PipelineError;
use super::ledger::CostLedger;
use super::outputs::{
    AssumptionsResult, AuditResult, ExecutionResult, PlanningResult, ReviewResult, StageOutput,
    WritingResult,
};
use super::stage::Stage;
use std::collections::{BTreeMap, BTreeSet};

/// Inputs that move the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The current stage produced output
    StageCompleted(StageOutput),
    /// The human accepted the current stage, optionally with instructions
    /// that later stages take into account
    Approve(Option<String>),
    /// Discard the current stage's output so it can run again
    Redo,
    /// Step back one stage, discarding both outputs
    Revise,
    /// Start over, keeping credentials
    Reset,
}

/// Explicit pipeline state
///
/// Transitions consume the state and return the next one, so a rejected
/// event leaves the caller's previous state untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineState {
    current: Stage,
    outputs: BTreeMap<Stage, StageOutput>,
    approved: BTreeSet<Stage>,
    ledger: CostLedger,
    credentials: Credentials,
    user_modifications: String,
}

impl PipelineState {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Default::default()
        }
    }

    /// Check that `stage` may run now.
    ///
    /// Every earlier stage needs output and the stage right before it needs
    /// an explicit approval.
    pub fn begin(&self, stage: Stage) -> Result<(), PipelineError> {
        if stage == Stage::Complete {
            return Err(PipelineError::AlreadyComplete);
        }
        if let Some(missing) = Stage::WORK
            .into_iter()
            .take_while(|s| *s < stage)
            .find(|s| !self.outputs.contains_key(s))
        {
            return Err(PipelineError::StageNotReady { stage, missing });
        }
        if let Some(requires) = stage.prev()
            && !self.approved.contains(&requires)
        {
            return Err(PipelineError::NotApproved { stage, requires });
        }
        if stage != self.current {
            return Err(PipelineError::OutOfOrder {
                current: self.current,
                requested: stage,
            });
        }
        Ok(())
    }

    pub fn apply(self, event: PipelineEvent) -> Result<PipelineState, PipelineError> {
        match event {
            PipelineEvent::StageCompleted(output) => self.complete(output),
            PipelineEvent::Approve(modifications) => self.approve(modifications),
            PipelineEvent::Redo => self.redo(),
            PipelineEvent::Revise => self.revise(),
            PipelineEvent::Reset => Ok(self.reset()),
        }
    }

    fn complete(mut self, output: StageOutput) -> Result<Self, PipelineError> {
        let got = output.stage();
        if got != self.current {
            return Err(PipelineError::OutputMismatch {
                expected: self.current,
                got,
            });
        }
        self.begin(got)?;
        self.ledger.add(got, output.cost());
        self.outputs.insert(got, output);
        Ok(self)
    }

    fn approve(mut self, modifications: Option<String>) -> Result<Self, PipelineError> {
        let stage = self.current;
        let next = stage.next().ok_or(PipelineError::AlreadyComplete)?;
        if !self.outputs.contains_key(&stage) {
            return Err(PipelineError::NoOutput(stage));
        }
        if let Some(m) = modifications.filter(|m| !m.trim().is_empty()) {
            self.add_modification(m.trim());
        }
        self.approved.insert(stage);
        self.current = next;
        Ok(self)
    }

    /// Notes from successive approvals accumulate one per line; repeating a
    /// note already on record adds nothing
    fn add_modification(&mut self, note: &str) {
        if self.user_modifications.lines().any(|line| line == note) {
            return;
        }
        if !self.user_modifications.is_empty() {
            self.user_modifications.push('\n');
        }
        self.user_modifications.push_str(note);
    }

    fn redo(mut self) -> Result<Self, PipelineError> {
        if self.current == Stage::Complete {
            return Err(PipelineError::AlreadyComplete);
        }
        self.outputs.remove(&self.current);
        self.approved.remove(&self.current);
        Ok(self)
    }

    fn revise(mut self) -> Result<Self, PipelineError> {
        let from = self.current;
        let back = from.prev().ok_or(PipelineError::NothingToRevise(from))?;
        for stage in [from, back] {
            self.outputs.remove(&stage);
            self.approved.remove(&stage);
        }
        self.current = back;
        Ok(self)
    }

    fn reset(self) -> Self {
        Self::new(self.credentials)
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current == Stage::Complete
    }

    pub fn is_approved(&self, stage: Stage) -> bool {
        self.approved.contains(&stage)
    }

    pub fn output(&self, stage: Stage) -> Option<&StageOutput> {
        self.outputs.get(&stage)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &StageOutput> {
        self.outputs.values()
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    pub fn total_cost(&self) -> f64 {
        self.ledger.total()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn user_modifications(&self) -> &str {
        &self.user_modifications
    }

    pub fn audit(&self) -> Option<&AuditResult> {
        match self.outputs.get(&Stage::Audit) {
            Some(StageOutput::Audit(r)) => Some(r),
            _ => None,
        }
    }

    pub fn planning(&self) -> Option<&PlanningResult> {
        match self.outputs.get(&Stage::Planning) {
            Some(StageOutput::Planning(r)) => Some(r),
            _ => None,
        }
    }

    pub fn assumptions(&self) -> Option<&AssumptionsResult> {
        match self.outputs.get(&Stage::Assumptions) {
            Some(StageOutput::Assumptions(r)) => Some(r),
            _ => None,
        }
    }

    pub fn execution(&self) -> Option<&ExecutionResult> {
        match self.outputs.get(&Stage::Execution) {
            Some(StageOutput::Execution(r)) => Some(r),
            _ => None,
        }
    }

    pub fn review(&self) -> Option<&ReviewResult> {
        match self.outputs.get(&Stage::Review) {
            Some(StageOutput::Review(r)) => Some(r),
            _ => None,
        }
    }

    pub fn writing(&self) -> Option<&WritingResult> {
        match self.outputs.get(&Stage::Writing) {
            Some(StageOutput::Writing(r)) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Confidence;
    use crate::pipeline::outputs::ExecutionOutput;

    fn audit(cost: f64) -> StageOutput {
        StageOutput::Audit(AuditResult {
            report: "audit".into(),
            cost,
        })
    }

    fn planning(cost: f64) -> StageOutput {
        StageOutput::Planning(PlanningResult {
            proposals: vec![],
            synthesis: "plan".into(),
            synthesis_failed: false,
            disagreements: None,
            cost,
        })
    }

    fn assumptions(cost: f64) -> StageOutput {
        StageOutput::Assumptions(AssumptionsResult {
            report: "ok".into(),
            cost,
        })
    }

    fn creds() -> Credentials {
        Credentials::new(Some("or-key".into()), Some("oa-key".into()))
    }

    fn step(state: PipelineState, event: PipelineEvent) -> PipelineState {
        state.apply(event).unwrap()
    }

    fn through_assumptions() -> PipelineState {
        let s = PipelineState::new(creds());
        let s = step(s, PipelineEvent::StageCompleted(audit(0.01)));
        let s = step(s, PipelineEvent::Approve(None));
        let s = step(s, PipelineEvent::StageCompleted(planning(0.5)));
        let s = step(s, PipelineEvent::Approve(Some("use GEE".into())));
        step(s, PipelineEvent::StageCompleted(assumptions(0.1)))
    }

    #[test]
    fn test_happy_path_accumulates_cost() {
        let s = through_assumptions();
        assert_eq!(s.current(), Stage::Assumptions);
        assert!((s.total_cost() - 0.61).abs() < 1e-12);
        assert_eq!(s.user_modifications(), "use GEE");
        assert_eq!(s.planning().unwrap().synthesis, "plan");
        assert!(s.is_approved(Stage::Planning));
    }

    #[test]
    fn test_later_approval_notes_accumulate() {
        let s = through_assumptions();
        let s = step(s, PipelineEvent::Approve(Some("report robust SEs".into())));
        assert_eq!(s.user_modifications(), "use GEE\nreport robust SEs");
        assert_eq!(s.current(), Stage::Execution);
    }

    #[test]
    fn test_repeated_note_is_not_duplicated() {
        let s = PipelineState::new(creds());
        let s = step(s, PipelineEvent::StageCompleted(audit(0.01)));
        let s = step(s, PipelineEvent::Approve(Some("use GEE".into())));
        let s = step(s, PipelineEvent::StageCompleted(planning(0.5)));
        let s = step(s, PipelineEvent::Approve(Some(" use GEE ".into())));
        assert_eq!(s.user_modifications(), "use GEE");
    }

    #[test]
    fn test_reset_keeps_credentials() {
        let s = through_assumptions();
        assert!(s.total_cost() > 0.0);
        let s = step(s, PipelineEvent::Reset);
        assert_eq!(s.total_cost(), 0.0);
        assert_eq!(s.current(), Stage::Audit);
        assert!(Stage::WORK.iter().all(|st| s.output(*st).is_none()));
        assert_eq!(s.credentials().completion_api_key(), Some("or-key"));
        assert_eq!(s.credentials().sandbox_api_key(), Some("oa-key"));
        assert!(s.user_modifications().is_empty());
    }

    #[test]
    fn test_revise_from_assumptions() {
        let s = step(through_assumptions(), PipelineEvent::Revise);
        assert_eq!(s.current(), Stage::Planning);
        assert!(s.planning().is_none());
        assert!(s.assumptions().is_none());
        assert!(!s.is_approved(Stage::Planning));
        assert!(s.audit().is_some());
        // spend is never refunded
        assert!((s.total_cost() - 0.61).abs() < 1e-12);
        assert!(s.begin(Stage::Planning).is_ok());
    }

    #[test]
    fn test_revise_at_audit_fails() {
        let err = PipelineState::default()
            .apply(PipelineEvent::Revise)
            .unwrap_err();
        assert_eq!(err, PipelineError::NothingToRevise(Stage::Audit));
    }

    #[test]
    fn test_redo_adds_to_stage_cost() {
        let s = step(PipelineState::default(), PipelineEvent::StageCompleted(audit(0.02)));
        let s = step(s, PipelineEvent::Redo);
        assert!(s.audit().is_none());
        let s = step(s, PipelineEvent::StageCompleted(audit(0.03)));
        assert!((s.ledger().stage(Stage::Audit) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_approve_without_output_fails() {
        let err = PipelineState::default()
            .apply(PipelineEvent::Approve(None))
            .unwrap_err();
        assert_eq!(err, PipelineError::NoOutput(Stage::Audit));
    }

    #[test]
    fn test_gates_enforce_order() {
        let s = step(PipelineState::default(), PipelineEvent::StageCompleted(audit(0.0)));
        assert_eq!(
            s.begin(Stage::Planning),
            Err(PipelineError::NotApproved {
                stage: Stage::Planning,
                requires: Stage::Audit
            })
        );
        assert_eq!(
            s.begin(Stage::Assumptions),
            Err(PipelineError::StageNotReady {
                stage: Stage::Assumptions,
                missing: Stage::Planning
            })
        );
        let err = s.clone().apply(PipelineEvent::StageCompleted(planning(0.1))).unwrap_err();
        assert_eq!(
            err,
            PipelineError::OutputMismatch {
                expected: Stage::Audit,
                got: Stage::Planning
            }
        );
    }

    #[test]
    fn test_complete_after_writing() {
        let mut s = through_assumptions();
        s = step(s, PipelineEvent::Approve(None));
        s = step(
            s,
            PipelineEvent::StageCompleted(StageOutput::Execution(ExecutionResult {
                code: String::new(),
                verification: String::new(),
                verification_flagged: false,
                output: ExecutionOutput::failed("no python"),
                generation_cost: 0.2,
                execution_cost: 0.0,
            })),
        );
        s = step(s, PipelineEvent::Approve(None));
        s = step(
            s,
            PipelineEvent::StageCompleted(StageOutput::Review(ReviewResult {
                combined_review: String::new(),
                reviews: vec![],
                issues: None,
                confidence: Confidence::High,
                cost: 0.05,
            })),
        );
        s = step(s, PipelineEvent::Approve(None));
        s = step(
            s,
            PipelineEvent::StageCompleted(StageOutput::Writing(WritingResult {
                sections: Default::default(),
                document: crate::pipeline::outputs::DocumentArtifact::PlainText {
                    text: String::new(),
                },
                cost: 1.0,
            })),
        );
        s = step(s, PipelineEvent::Approve(None));
        assert!(s.is_complete());
        assert_eq!(s.begin(Stage::Complete), Err(PipelineError::AlreadyComplete));
        assert_eq!(
            s.clone().apply(PipelineEvent::Approve(None)).unwrap_err(),
            PipelineError::AlreadyComplete
        );
        assert!((s.total_cost() - 1.86).abs() < 1e-9);
    }
}
