//! Stage 4: Code Generation & Execution

use super::{StageOrchestrator, StudyInputs};
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::core::string::head_chars;
use council_domain::{
    Conversation, ExecutionOutput, ExecutionResult, PromptTemplate, Stage, extract_code_block,
    verification_flags_problem,
};
use tracing::{info, warn};

/// Verification text quoted into the code header when flagged
const VERIFICATION_NOTE_CHARS: usize = 500;

/// What the code stage needs from earlier stages
#[derive(Debug, Clone, Copy)]
pub struct ExecutionInputs<'a> {
    pub analysis_plan: &'a str,
    pub assumptions: &'a str,
    pub user_modifications: &'a str,
}

impl<G: CompletionGateway + 'static> StageOrchestrator<G> {
    /// Stage 4: generate code, have it verified, then run it in the sandbox.
    ///
    /// A flagged verification never blocks execution; its first 500 chars
    /// are prepended to the code as comments instead.
    pub async fn execution(
        &self,
        inputs: &StudyInputs,
        prior: ExecutionInputs<'_>,
        progress: &dyn ProgressNotifier,
    ) -> ExecutionResult {
        info!("Stage 4: Code Generation & Execution");
        let journal = inputs.context.journal_format();

        let generation = self
            .call(
                Stage::Execution,
                self.config.code_model,
                Conversation::system_user(
                    PromptTemplate::code_gen_system(),
                    PromptTemplate::code_gen_user(
                        inputs.data_summary(),
                        inputs.dataset.columns(),
                        prior.analysis_plan,
                        prior.assumptions,
                        prior.user_modifications,
                        journal,
                    ),
                ),
                self.config.code_temperature,
                self.config.standard_call,
                progress,
            )
            .await;

        let Some(generated) = generation.content() else {
            warn!("Code generation failed; skipping verification and execution");
            return ExecutionResult {
                code: String::new(),
                verification: String::new(),
                verification_flagged: false,
                output: ExecutionOutput::failed(generation.text()),
                generation_cost: generation.cost(),
                execution_cost: 0.0,
            };
        };
        let code = extract_code_block(generated);

        let verification = self
            .call(
                Stage::Execution,
                self.config.verify_model,
                Conversation::system_user(
                    PromptTemplate::code_verify_system(),
                    PromptTemplate::code_verify_user(&code, prior.analysis_plan),
                ),
                self.config.analytical_temperature,
                self.config.standard_call,
                progress,
            )
            .await;

        let verification_text = verification.text();
        let flagged = verification
            .content()
            .is_some_and(verification_flags_problem);
        let code = if flagged {
            info!("Verification flagged a problem; prepending notes to the code");
            format!(
                "{}\n\n{}",
                verification_header(head_chars(&verification_text, VERIFICATION_NOTE_CHARS)),
                code
            )
        } else {
            code
        };

        progress.on_sandbox_start();
        let output = self.executor.execute(&code, &inputs.dataset).await;
        progress.on_sandbox_complete(output.succeeded);
        if !output.succeeded {
            warn!("Sandbox run did not succeed");
        }

        ExecutionResult {
            execution_cost: output.cost,
            generation_cost: generation.cost() + verification.cost(),
            code,
            verification: verification_text,
            verification_flagged: flagged,
            output,
        }
    }
}

/// Comment block placed above flagged code; every line stays a Python comment
fn verification_header(excerpt: &str) -> String {
    let mut header = String::from("# VERIFICATION NOTES:");
    for line in excerpt.lines() {
        header.push('\n');
        if line.trim().is_empty() {
            header.push('#');
        } else {
            header.push_str("# ");
            header.push_str(line);
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::CouncilConfig;
    use crate::ports::document_renderer::PlainTextRenderer;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::completion_client::CompletionClient;
    use council_domain::{ModelKey, ResearchContext, TokenUsage};
    use std::sync::Arc;

    fn setup(
        gateway: ScriptedGateway,
        output: ExecutionOutput,
    ) -> (StageOrchestrator<ScriptedGateway>, Arc<ScriptedGateway>, Arc<FixedExecutor>) {
        let gateway = Arc::new(gateway);
        let executor = Arc::new(FixedExecutor::new(output));
        let orch = StageOrchestrator::new(
            CompletionClient::new(Arc::clone(&gateway)),
            executor.clone(),
            Arc::new(PlainTextRenderer),
            CouncilConfig::default(),
        );
        (orch, gateway, executor)
    }

    fn inputs() -> StudyInputs {
        StudyInputs::new(
            sample_dataset(),
            ResearchContext::new("q", "complication", "bmi").with_journal("JBJS"),
        )
    }

    const PRIOR: ExecutionInputs<'static> = ExecutionInputs {
        analysis_plan: "logistic regression",
        assumptions: "EPV fine",
        user_modifications: "",
    };

    fn sandbox_ok() -> ExecutionOutput {
        ExecutionOutput {
            text: "OR 1.08 (95% CI 1.02-1.15)".into(),
            cost: 0.03,
            succeeded: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_clean_verification_runs_extracted_code() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::O3, "Here you go:\n```python\nimport pandas as pd\n```", TokenUsage::new(100, 100))
            .reply(ModelKey::DeepSeekR1, "Looks correct.", TokenUsage::new(100, 100));
        let (orch, gateway, executor) = setup(gateway, sandbox_ok());

        let result = orch.execution(&inputs(), PRIOR, &NoProgress).await;

        assert_eq!(result.code, "import pandas as pd");
        assert!(!result.verification_flagged);
        assert_eq!(executor.received.lock().unwrap().as_slice(), ["import pandas as pd"]);
        assert_eq!(result.execution_cost, 0.03);
        let expected = ModelKey::O3.spec().cost(&TokenUsage::new(100, 100))
            + ModelKey::DeepSeekR1.spec().cost(&TokenUsage::new(100, 100));
        assert!((result.generation_cost - expected).abs() < 1e-12);
        assert!(gateway.user_prompt(0).contains("Journal of Bone and Joint Surgery"));
        assert!(gateway.user_prompt(1).contains("```python\nimport pandas as pd\n```"));
    }

    #[tokio::test]
    async fn test_flagged_verification_prepends_notes() {
        let long_note = "Bug: the model omits age. ".repeat(40);
        let note: &'static str = Box::leak(long_note.clone().into_boxed_str());
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::O3, "print('hi')", TokenUsage::default())
            .reply(ModelKey::DeepSeekR1, note, TokenUsage::default());
        let (orch, _, executor) = setup(gateway, sandbox_ok());

        let result = orch.execution(&inputs(), PRIOR, &NoProgress).await;

        assert!(result.verification_flagged);
        let expected_header = format!("# VERIFICATION NOTES:\n# {}\n\n", &long_note[..500]);
        assert!(result.code.starts_with(&expected_header));
        assert!(result.code.ends_with("print('hi')"));
        assert_eq!(executor.received.lock().unwrap()[0], result.code);
    }

    #[tokio::test]
    async fn test_multiline_verification_notes_stay_commented() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::O3, "```python\nprint('hi')\n```", TokenUsage::default())
            .reply(
                ModelKey::DeepSeekR1,
                "Found a bug:\n1. age is not adjusted\n\n2. use robust SEs",
                TokenUsage::default(),
            );
        let (orch, _, executor) = setup(gateway, sandbox_ok());

        let result = orch.execution(&inputs(), PRIOR, &NoProgress).await;

        assert!(result.verification_flagged);
        let (header, body) = result.code.rsplit_once("\n\n").unwrap();
        let uncommented: Vec<&str> = header.lines().filter(|l| !l.starts_with('#')).collect();
        assert!(uncommented.is_empty(), "uncommented header lines: {uncommented:?}");
        assert_eq!(
            header,
            "# VERIFICATION NOTES:\n# Found a bug:\n# 1. age is not adjusted\n#\n# 2. use robust SEs"
        );
        assert_eq!(body, "print('hi')");
        assert_eq!(executor.received.lock().unwrap()[0], result.code);
    }

    #[tokio::test]
    async fn test_failed_generation_skips_sandbox() {
        let gateway = ScriptedGateway::new().fail(ModelKey::O3);
        let (orch, gateway, executor) = setup(gateway, sandbox_ok());

        let result = orch.execution(&inputs(), PRIOR, &NoProgress).await;

        assert_eq!(gateway.call_count(), 1);
        assert!(executor.received.lock().unwrap().is_empty());
        assert!(!result.output.succeeded);
        assert!(result.output.text.starts_with("Error calling OpenAI o3"));
        assert_eq!(result.execution_cost, 0.0);
    }

    #[tokio::test]
    async fn test_failed_verification_is_not_flagged() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::O3, "print(1)", TokenUsage::default())
            .fail(ModelKey::DeepSeekR1);
        let (orch, _, _) = setup(gateway, sandbox_ok());

        let result = orch.execution(&inputs(), PRIOR, &NoProgress).await;

        // the transport error text mentions "Error" but is not a verdict
        assert!(!result.verification_flagged);
        assert_eq!(result.code, "print(1)");
    }
}
