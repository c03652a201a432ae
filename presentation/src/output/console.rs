//! Console output for pipeline runs

use colored::Colorize;
use council_domain::core::string::truncate;
use council_domain::{
    AnalysisMode, DatasetProfile, PipelineState, ResearchContext, Stage, StageOutput,
};
use std::path::PathBuf;

/// Gate summaries cut the stage's main text to this many bytes
const GATE_PREVIEW_LIMIT: usize = 2_000;

/// Formats run banners, gate summaries and the final report
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed before the first stage
    pub fn run_banner(
        context: &ResearchContext,
        profile: &DatasetProfile,
        mode: AnalysisMode,
    ) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Stats Council"));
        output.push('\n');

        if !context.research_question.trim().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Question:".cyan().bold(),
                context.research_question
            ));
        }
        output.push_str(&format!(
            "{} {}   {} {}\n",
            "Outcome:".cyan().bold(),
            Self::or_unset(&context.outcome_var),
            "Exposure:".cyan().bold(),
            Self::or_unset(&context.exposure_var)
        ));
        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Design:".cyan().bold(),
            context.study_design,
            "Journal:".cyan().bold(),
            context.journal_format().name,
            "Mode:".cyan().bold(),
            mode
        ));
        output.push_str(&format!(
            "{} {} rows × {} columns\n",
            "Dataset:".cyan().bold(),
            profile.rows,
            profile.columns.len()
        ));
        output
    }

    /// Short view of a stage's output shown at the approval gate
    pub fn stage_summary(output: &StageOutput, total_cost: f64) -> String {
        let stage = output.stage();
        let mut text = Self::section_header(stage.display_name());
        text.push('\n');

        match output {
            StageOutput::Planning(planning) => {
                for proposal in &planning.proposals {
                    let marker = if proposal.failed {
                        "x".red()
                    } else {
                        "v".green()
                    };
                    text.push_str(&format!(
                        "  {} proposal from {}\n",
                        marker,
                        proposal.model.display_name()
                    ));
                }
                text.push('\n');
            }
            StageOutput::Execution(execution) => {
                if execution.verification_flagged {
                    text.push_str(&format!(
                        "{}\n",
                        "Verification flagged possible problems in the code".yellow()
                    ));
                }
                let status = if execution.output.succeeded {
                    "script ran".green()
                } else {
                    "script failed".red()
                };
                text.push_str(&format!(
                    "{} {} ({} figures, {} tables)\n\n",
                    "Sandbox:".cyan().bold(),
                    status,
                    execution.output.figures.len(),
                    execution.output.tables.len()
                ));
            }
            StageOutput::Review(review) => {
                text.push_str(&format!(
                    "{} {}\n\n",
                    "Confidence:".cyan().bold(),
                    Self::confidence_label(review.confidence.as_str())
                ));
            }
            StageOutput::Writing(writing) => {
                let kind = if writing.document.is_fallback() {
                    "plain text (converter unavailable)".yellow()
                } else {
                    writing.document.extension().normal()
                };
                text.push_str(&format!("{} {}\n\n", "Document:".cyan().bold(), kind));
            }
            StageOutput::Audit(_) | StageOutput::Assumptions(_) => {}
        }

        text.push_str(&truncate(output.headline(), GATE_PREVIEW_LIMIT));
        text.push('\n');

        if let StageOutput::Planning(planning) = output
            && let Some(disagreements) = &planning.disagreements
        {
            text.push_str(&format!("\n{}\n", "Points of disagreement:".yellow().bold()));
            text.push_str(&Self::indent(disagreements, "  "));
            text.push('\n');
        }
        if let StageOutput::Review(review) = output
            && let Some(issues) = &review.issues
        {
            text.push_str(&format!("\n{}\n", "Issues raised:".yellow().bold()));
            text.push_str(&Self::indent(issues, "  "));
            text.push('\n');
        }

        text.push_str(&format!(
            "\n{} ${:.4}   {} ${:.4}\n",
            "Stage cost:".dimmed(),
            output.cost(),
            "Running total:".dimmed(),
            total_cost
        ));
        text
    }

    /// Everything a stage produced, for the `show` gate command
    pub fn stage_detail(output: &StageOutput) -> String {
        let mut text = Self::section_header(output.stage().display_name());
        match output {
            StageOutput::Audit(audit) => text.push_str(&format!("\n{}\n", audit.report)),
            StageOutput::Assumptions(assumptions) => {
                text.push_str(&format!("\n{}\n", assumptions.report))
            }
            StageOutput::Planning(planning) => {
                for proposal in &planning.proposals {
                    text.push_str(&format!(
                        "\n{}\n{}\n",
                        format!("── {} ──", proposal.model.display_name())
                            .yellow()
                            .bold(),
                        proposal.text
                    ));
                }
                text.push_str(&format!(
                    "\n{}\n{}\n",
                    "── Synthesized plan ──".green().bold(),
                    planning.synthesis
                ));
            }
            StageOutput::Execution(execution) => {
                text.push_str(&format!(
                    "\n{}\n{}\n",
                    "── Code ──".yellow().bold(),
                    execution.code
                ));
                text.push_str(&format!(
                    "\n{}\n{}\n",
                    "── Verification ──".yellow().bold(),
                    execution.verification
                ));
                text.push_str(&format!(
                    "\n{}\n{}\n",
                    "── Output ──".yellow().bold(),
                    execution.output.text
                ));
            }
            StageOutput::Review(review) => {
                text.push_str(&format!("\n{}\n", review.combined_review));
            }
            StageOutput::Writing(writing) => {
                text.push_str(&format!("\n{}\n", writing.sections.to_plain_text()));
            }
        }
        text
    }

    /// Report printed when the run ends, complete or not
    pub fn final_summary(state: &PipelineState, written: &[PathBuf]) -> String {
        let mut output = String::new();
        let title = if state.is_complete() {
            "Analysis Complete"
        } else {
            "Run Stopped"
        };
        output.push_str(&Self::header(title));
        output.push('\n');

        if !state.is_complete() {
            output.push_str(&format!(
                "{} {}\n",
                "Stopped at:".yellow().bold(),
                state.current()
            ));
        }

        output.push_str(&format!("\n{}\n", "Cost breakdown:".cyan().bold()));
        for stage in Stage::WORK {
            let cost = state.ledger().stage(stage);
            if cost > 0.0 || state.output(stage).is_some() {
                output.push_str(&format!("  {:<28} ${:.4}\n", stage.display_name(), cost));
            }
        }
        output.push_str(&format!(
            "  {:<28} {}\n",
            "Total".bold(),
            format!("${:.4}", state.total_cost()).bold()
        ));

        if !written.is_empty() {
            output.push_str(&format!("\n{}\n", "Files written:".cyan().bold()));
            for path in written {
                output.push_str(&format!("  {}\n", path.display()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn confidence_label(label: &str) -> colored::ColoredString {
        match label {
            "HIGH" => label.green().bold(),
            "MEDIUM" => label.yellow().bold(),
            _ => label.red().bold(),
        }
    }

    fn or_unset(value: &str) -> &str {
        if value.trim().is_empty() {
            "(not set)"
        } else {
            value
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        Confidence, Credentials, ModelKey, PipelineEvent, PlanningResult, Proposal, ReviewResult,
    };

    fn plain() {
        colored::control::set_override(false);
    }

    fn planning() -> StageOutput {
        StageOutput::Planning(PlanningResult {
            proposals: vec![
                Proposal {
                    model: ModelKey::DeepSeekR1,
                    text: "Logistic regression".into(),
                    failed: false,
                },
                Proposal {
                    model: ModelKey::Gemini25Pro,
                    text: "Error calling Gemini 2.5 Pro: timeout".into(),
                    failed: true,
                },
            ],
            synthesis: "Primary analysis: logistic regression of complication on BMI.".into(),
            synthesis_failed: false,
            disagreements: Some("- Whether to categorize BMI".into()),
            cost: 0.0421,
        })
    }

    #[test]
    fn test_planning_summary_lists_proposals_and_disagreements() {
        plain();
        let text = ConsoleFormatter::stage_summary(&planning(), 0.05);

        assert!(text.contains("Planning Council"));
        assert!(text.contains("v proposal from DeepSeek R1"));
        assert!(text.contains("x proposal from Gemini 2.5 Pro"));
        assert!(text.contains("Primary analysis: logistic regression"));
        assert!(text.contains("Points of disagreement:"));
        assert!(text.contains("  - Whether to categorize BMI"));
        assert!(text.contains("$0.0421"));
        assert!(text.contains("$0.0500"));
    }

    #[test]
    fn test_review_summary_shows_confidence_and_issues() {
        plain();
        let output = StageOutput::Review(ReviewResult {
            combined_review: "## Review 1 (OpenAI o3)\nCritical flaw".into(),
            reviews: vec![],
            issues: Some("Critical flaw".into()),
            confidence: Confidence::Low,
            cost: 0.01,
        });
        let text = ConsoleFormatter::stage_summary(&output, 0.2);

        assert!(text.contains("Confidence: LOW"));
        assert!(text.contains("Issues raised:"));
    }

    #[test]
    fn test_detail_includes_every_proposal() {
        plain();
        let text = ConsoleFormatter::stage_detail(&planning());
        assert!(text.contains("── DeepSeek R1 ──"));
        assert!(text.contains("── Gemini 2.5 Pro ──"));
        assert!(text.contains("── Synthesized plan ──"));
    }

    #[test]
    fn test_final_summary_for_stopped_run() {
        plain();
        let state = PipelineState::new(Credentials::default())
            .apply(PipelineEvent::StageCompleted(audit_output()))
            .unwrap();
        let text = ConsoleFormatter::final_summary(&state, &[PathBuf::from("out/audit_trail.json")]);

        assert!(text.contains("Run Stopped"));
        assert!(text.contains("Stopped at: Data Audit"));
        assert!(text.contains("Data Audit"));
        assert!(text.contains("out/audit_trail.json"));
    }

    fn audit_output() -> StageOutput {
        StageOutput::Audit(council_domain::AuditResult {
            report: "No major issues".into(),
            cost: 0.003,
        })
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
