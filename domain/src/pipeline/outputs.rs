//! Per-stage results

use super::stage::Stage;
use crate::conversation::CompletionResult;
use crate::core::model::ModelKey;
use crate::extract::Confidence;
use crate::study::DataTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// One council member's contribution (a proposal or a review)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub model: ModelKey,
    pub text: String,
    /// The call failed; `text` holds the error message
    pub failed: bool,
}

impl From<&CompletionResult> for Proposal {
    fn from(result: &CompletionResult) -> Self {
        Self {
            model: result.model(),
            text: result.text(),
            failed: result.is_failure(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    pub report: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningResult {
    /// In council order, failed ones included
    pub proposals: Vec<Proposal>,
    pub synthesis: String,
    pub synthesis_failed: bool,
    pub disagreements: Option<String>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssumptionsResult {
    pub report: String,
    pub cost: f64,
}

/// What the sandbox produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionOutput {
    /// Captured stdout, or the failure description
    pub text: String,
    /// PNG bytes, in file-name order
    #[serde(skip)]
    pub figures: Vec<Vec<u8>>,
    pub tables: BTreeMap<String, DataTable>,
    pub cost: f64,
    pub succeeded: bool,
}

impl ExecutionOutput {
    /// A failed run: zero cost, no artifacts
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            text: reason.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Extracted code, with verification notes prepended when flagged
    pub code: String,
    pub verification: String,
    pub verification_flagged: bool,
    pub output: ExecutionOutput,
    /// Generation plus verification calls
    pub generation_cost: f64,
    pub execution_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewResult {
    pub combined_review: String,
    pub reviews: Vec<Proposal>,
    pub issues: Option<String>,
    pub confidence: Confidence,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManuscriptSections {
    pub methods: String,
    pub results: String,
    pub legends: String,
    pub limitations: String,
}

impl ManuscriptSections {
    /// Plain-text rendering used when no document renderer is available
    pub fn to_plain_text(&self) -> String {
        format!(
            "METHODS\n\n{}\n\nRESULTS\n\n{}\n\nFIGURE LEGENDS\n\n{}\n\nLIMITATIONS\n\n{}",
            self.methods, self.results, self.legends, self.limitations
        )
    }
}

/// Rendered manuscript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentArtifact {
    Binary {
        extension: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    PlainText {
        text: String,
    },
}

impl DocumentArtifact {
    pub fn extension(&self) -> &str {
        match self {
            DocumentArtifact::Binary { extension, .. } => extension,
            DocumentArtifact::PlainText { .. } => "txt",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            DocumentArtifact::Binary { bytes, .. } => bytes,
            DocumentArtifact::PlainText { text } => text.as_bytes(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DocumentArtifact::PlainText { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritingResult {
    pub sections: ManuscriptSections,
    pub document: DocumentArtifact,
    pub cost: f64,
}

/// Output of any stage, as recorded in the pipeline state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", content = "output", rename_all = "snake_case")]
pub enum StageOutput {
    Audit(AuditResult),
    Planning(PlanningResult),
    Assumptions(AssumptionsResult),
    Execution(ExecutionResult),
    Review(ReviewResult),
    Writing(WritingResult),
}

impl StageOutput {
    pub fn stage(&self) -> Stage {
        match self {
            StageOutput::Audit(_) => Stage::Audit,
            StageOutput::Planning(_) => Stage::Planning,
            StageOutput::Assumptions(_) => Stage::Assumptions,
            StageOutput::Execution(_) => Stage::Execution,
            StageOutput::Review(_) => Stage::Review,
            StageOutput::Writing(_) => Stage::Writing,
        }
    }

    /// Everything this stage spent
    pub fn cost(&self) -> f64 {
        match self {
            StageOutput::Audit(r) => r.cost,
            StageOutput::Planning(r) => r.cost,
            StageOutput::Assumptions(r) => r.cost,
            StageOutput::Execution(r) => r.generation_cost + r.execution_cost,
            StageOutput::Review(r) => r.cost,
            StageOutput::Writing(r) => r.cost,
        }
    }

    /// Main text shown to the human at the approval gate
    pub fn headline(&self) -> &str {
        match self {
            StageOutput::Audit(r) => &r.report,
            StageOutput::Planning(r) => &r.synthesis,
            StageOutput::Assumptions(r) => &r.report,
            StageOutput::Execution(r) => &r.output.text,
            StageOutput::Review(r) => &r.combined_review,
            StageOutput::Writing(r) => &r.sections.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_all_headings() {
        let sections = ManuscriptSections {
            methods: "m".into(),
            results: "r".into(),
            legends: "l".into(),
            limitations: "x".into(),
        };
        assert_eq!(
            sections.to_plain_text(),
            "METHODS\n\nm\n\nRESULTS\n\nr\n\nFIGURE LEGENDS\n\nl\n\nLIMITATIONS\n\nx"
        );
    }

    #[test]
    fn test_execution_cost_sums_generation_and_sandbox() {
        let output = StageOutput::Execution(ExecutionResult {
            code: "print(1)".into(),
            verification: "fine".into(),
            verification_flagged: false,
            output: ExecutionOutput {
                cost: 0.03,
                succeeded: true,
                ..Default::default()
            },
            generation_cost: 0.12,
            execution_cost: 0.03,
        });
        assert_eq!(output.stage(), Stage::Execution);
        assert!((output.cost() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_proposal_from_failure() {
        let failure = CompletionResult::Failure {
            model: ModelKey::Gemini25Pro,
            error: "HTTP 500".into(),
        };
        let proposal = Proposal::from(&failure);
        assert!(proposal.failed);
        assert_eq!(proposal.text, "Error calling Gemini 2.5 Pro: HTTP 500");
    }

    #[test]
    fn test_document_artifact_accessors() {
        let doc = DocumentArtifact::PlainText { text: "abc".into() };
        assert_eq!(doc.extension(), "txt");
        assert_eq!(doc.bytes(), b"abc");
        assert!(doc.is_fallback());
    }
}
