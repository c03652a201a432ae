//! Run Pipeline use case
//!
//! Drives the six stages in order, stopping at each approval gate.

use super::audit_trail::{AuditTrail, DecisionRecord};
use super::orchestrator::{
    ExecutionInputs, ReviewInputs, StageOrchestrator, StudyInputs,
};
use crate::ports::approval::{ApprovalDecision, ApprovalError, ApprovalPort, AutoApprove};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use chrono::Utc;
use council_domain::{
    AnalysisMode, Credentials, DataTable, PipelineError, PipelineEvent, PipelineState,
    ResearchContext, Stage, StageOutput,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop a pipeline run
#[derive(Error, Debug)]
pub enum RunPipelineError {
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("OPENROUTER_API_KEY is not set; completions cannot run")]
    MissingCredentials,

    #[error("Stage {0} is missing the output of an earlier stage")]
    MissingInput(Stage),

    #[error("Run aborted at the {} gate", .0.state.current())]
    Aborted(Box<RunPipelineOutput>),

    #[error("Approval failed: {0}")]
    Approval(#[from] ApprovalError),
}

/// Input for the RunPipeline use case
#[derive(Debug, Clone)]
pub struct RunPipelineInput {
    pub dataset: DataTable,
    pub context: ResearchContext,
    pub credentials: Credentials,
    pub mode: AnalysisMode,
}

impl RunPipelineInput {
    pub fn new(dataset: DataTable, context: ResearchContext, credentials: Credentials) -> Self {
        Self {
            dataset,
            context,
            credentials,
            mode: AnalysisMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Final (or partial, when aborted) state of a run
#[derive(Debug)]
pub struct RunPipelineOutput {
    pub state: PipelineState,
    pub trail: AuditTrail,
}

/// Use case for running the staged analysis pipeline
pub struct RunPipelineUseCase<G: CompletionGateway + 'static> {
    orchestrator: StageOrchestrator<G>,
    approval: Arc<dyn ApprovalPort>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: CompletionGateway + 'static> RunPipelineUseCase<G> {
    pub fn new(orchestrator: StageOrchestrator<G>, approval: Arc<dyn ApprovalPort>) -> Self {
        Self {
            orchestrator,
            approval,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunPipelineInput,
    ) -> Result<RunPipelineOutput, RunPipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunPipelineOutput, RunPipelineError> {
        if input.credentials.require_completion().is_err() {
            return Err(RunPipelineError::MissingCredentials);
        }

        for column in input.context.required_columns() {
            if !input.dataset.columns().iter().any(|c| c == column) {
                warn!("Column '{}' is not in the dataset", column);
            }
        }

        let approval: &dyn ApprovalPort = if input.mode.auto_approves() {
            &AutoApprove
        } else {
            self.approval.as_ref()
        };

        info!(
            "Starting {} on {} rows",
            input.mode.as_str(),
            input.dataset.row_count()
        );

        let inputs = StudyInputs::new(input.dataset, input.context);
        let mut state = PipelineState::new(input.credentials);
        let mut decisions = Vec::new();

        while !state.is_complete() {
            let stage = state.current();
            state.begin(stage)?;

            progress.on_stage_start(stage, self.orchestrator.config().calls_for(stage));
            let output = self.run_stage(stage, &inputs, &state, progress).await?;
            let stage_cost = output.cost();
            state = state.apply(PipelineEvent::StageCompleted(output))?;
            progress.on_stage_complete(stage, stage_cost, state.total_cost());
            self.logger.log(ConversationEvent::stage_completed(
                stage,
                stage_cost,
                state.total_cost(),
            ));

            let decision = approval.decide(stage, &state).await?;
            info!("{}: {}", stage.display_name(), decision.as_str());
            self.logger.log(ConversationEvent::decision(stage, &decision));

            let record =
                DecisionRecord::new(stage, decision.as_str(), state.ledger().stage(stage));
            state = match decision {
                ApprovalDecision::Approve(modifications) => {
                    decisions.push(record.with_modifications(modifications.clone()));
                    state.apply(PipelineEvent::Approve(modifications))?
                }
                ApprovalDecision::Redo => {
                    decisions.push(record);
                    state.apply(PipelineEvent::Redo)?
                }
                ApprovalDecision::Revise if stage.prev().is_none() => {
                    warn!("Nothing before {} to revise; running it again", stage);
                    decisions.push(record);
                    state.apply(PipelineEvent::Redo)?
                }
                ApprovalDecision::Revise => {
                    decisions.push(record);
                    state.apply(PipelineEvent::Revise)?
                }
                ApprovalDecision::Restart => {
                    decisions.push(record);
                    state.apply(PipelineEvent::Reset)?
                }
                ApprovalDecision::Abort => {
                    decisions.push(record);
                    let trail = AuditTrail::capture(&state, &inputs.context, decisions, Utc::now());
                    return Err(RunPipelineError::Aborted(Box::new(RunPipelineOutput {
                        state,
                        trail,
                    })));
                }
            };
        }

        info!("Pipeline complete, total cost ${:.4}", state.total_cost());
        let trail = AuditTrail::capture(&state, &inputs.context, decisions, Utc::now());
        Ok(RunPipelineOutput { state, trail })
    }

    /// Run one stage with the outputs of the stages before it
    async fn run_stage(
        &self,
        stage: Stage,
        inputs: &StudyInputs,
        state: &PipelineState,
        progress: &dyn ProgressNotifier,
    ) -> Result<StageOutput, RunPipelineError> {
        let missing = || RunPipelineError::MissingInput(stage);
        let orch = &self.orchestrator;

        let output = match stage {
            Stage::Audit => StageOutput::Audit(orch.audit(inputs, progress).await),
            Stage::Planning => {
                let audit = state.audit().ok_or_else(missing)?;
                StageOutput::Planning(orch.planning(inputs, &audit.report, progress).await)
            }
            Stage::Assumptions => {
                let plan = state.planning().ok_or_else(missing)?;
                StageOutput::Assumptions(
                    orch.assumptions(inputs, &plan.synthesis, state.user_modifications(), progress)
                        .await,
                )
            }
            Stage::Execution => {
                let plan = state.planning().ok_or_else(missing)?;
                let assumptions = state.assumptions().ok_or_else(missing)?;
                let prior = ExecutionInputs {
                    analysis_plan: &plan.synthesis,
                    assumptions: &assumptions.report,
                    user_modifications: state.user_modifications(),
                };
                StageOutput::Execution(orch.execution(inputs, prior, progress).await)
            }
            Stage::Review => {
                let plan = state.planning().ok_or_else(missing)?;
                let assumptions = state.assumptions().ok_or_else(missing)?;
                let execution = state.execution().ok_or_else(missing)?;
                let prior = ReviewInputs {
                    analysis_plan: &plan.synthesis,
                    code: &execution.code,
                    results: &execution.output.text,
                    assumptions: &assumptions.report,
                };
                StageOutput::Review(orch.review(prior, progress).await)
            }
            Stage::Writing => {
                let plan = state.planning().ok_or_else(missing)?;
                let execution = state.execution().ok_or_else(missing)?;
                let review = state.review().ok_or_else(missing)?;
                StageOutput::Writing(
                    orch.writing(
                        inputs,
                        &plan.synthesis,
                        &execution.output,
                        &review.combined_review,
                        progress,
                    )
                    .await,
                )
            }
            Stage::Complete => return Err(PipelineError::AlreadyComplete.into()),
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::super::orchestrator::test_support::*;
    use super::*;
    use crate::config::CouncilConfig;
    use crate::ports::document_renderer::PlainTextRenderer;
    use crate::use_cases::completion_client::CompletionClient;
    use async_trait::async_trait;
    use council_domain::{ExecutionOutput, ModelKey, TokenUsage};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out scripted decisions, then approves everything
    struct ScriptedApproval {
        decisions: Mutex<VecDeque<ApprovalDecision>>,
        asked: Mutex<Vec<Stage>>,
    }

    impl ScriptedApproval {
        fn new(decisions: Vec<ApprovalDecision>) -> Self {
            Self {
                decisions: Mutex::new(decisions.into()),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ApprovalPort for ScriptedApproval {
        async fn decide(
            &self,
            stage: Stage,
            _state: &PipelineState,
        ) -> Result<ApprovalDecision, ApprovalError> {
            self.asked.lock().unwrap().push(stage);
            Ok(self
                .decisions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ApprovalDecision::Approve(None)))
        }
    }

    fn use_case(
        gateway: ScriptedGateway,
        approval: Arc<ScriptedApproval>,
    ) -> (RunPipelineUseCase<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        let orchestrator = StageOrchestrator::new(
            CompletionClient::new(Arc::clone(&gateway)),
            Arc::new(FixedExecutor::new(ExecutionOutput {
                text: "OR 1.08".into(),
                cost: 0.03,
                succeeded: true,
                ..Default::default()
            })),
            Arc::new(PlainTextRenderer),
            CouncilConfig::default(),
        );
        (RunPipelineUseCase::new(orchestrator, approval), gateway)
    }

    fn input(mode: AnalysisMode) -> RunPipelineInput {
        RunPipelineInput::new(
            sample_dataset(),
            ResearchContext::new("Is BMI associated with complications?", "complication", "bmi"),
            Credentials::new(Some("sk-or-test".into()), None),
        )
        .with_mode(mode)
    }

    /// 1 audit + 4 planning + 1 assumptions + 2 code + 2 review + 4 writing
    const FULL_RUN_CALLS: usize = 14;

    #[tokio::test]
    async fn test_quick_mode_runs_to_completion() {
        let approval = Arc::new(ScriptedApproval::new(vec![ApprovalDecision::Abort]));
        let gateway = ScriptedGateway::new().reply(
            ModelKey::DeepSeekV3,
            "Audit report",
            TokenUsage::new(4000, 1000),
        );
        let (uc, gateway) = use_case(gateway, approval.clone());

        let output = uc.execute(input(AnalysisMode::QuickAnalysis)).await.unwrap();

        assert!(output.state.is_complete());
        assert_eq!(gateway.call_count(), FULL_RUN_CALLS);
        // Quick mode never consults the human
        assert!(approval.asked.lock().unwrap().is_empty());
        let audit_cost = ModelKey::DeepSeekV3.spec().cost(&TokenUsage::new(4000, 1000));
        assert!((output.state.total_cost() - (audit_cost + 0.03)).abs() < 1e-12);
        assert_eq!(output.trail.decisions.len(), 6);
        assert!(output.state.writing().is_some());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_fatal() {
        let (uc, gateway) = use_case(ScriptedGateway::new(), Arc::new(ScriptedApproval::new(vec![])));
        let mut input = input(AnalysisMode::FullPipeline);
        input.credentials = Credentials::new(Some("   ".into()), Some("sk-openai".into()));

        let err = uc.execute(input).await.unwrap_err();

        assert!(matches!(err, RunPipelineError::MissingCredentials));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_interactive_gates_each_stage() {
        let approval = Arc::new(ScriptedApproval::new(vec![]));
        let (uc, _) = use_case(ScriptedGateway::new(), approval.clone());

        let output = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap();

        assert!(output.state.is_complete());
        assert_eq!(approval.asked.lock().unwrap().as_slice(), Stage::WORK.as_slice());
    }

    #[tokio::test]
    async fn test_modifications_reach_later_prompts() {
        let approval = Arc::new(ScriptedApproval::new(vec![
            ApprovalDecision::Approve(None),
            ApprovalDecision::Approve(Some("Add restricted cubic splines for age".into())),
        ]));
        let (uc, gateway) = use_case(ScriptedGateway::new(), approval);

        let output = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap();

        // Sixth call is the assumptions check
        assert!(gateway
            .user_prompt(5)
            .contains("USER MODIFICATIONS:\nAdd restricted cubic splines for age"));
        assert_eq!(
            output.state.user_modifications(),
            "Add restricted cubic splines for age"
        );
        assert_eq!(
            output.trail.decisions[1].modifications.as_deref(),
            Some("Add restricted cubic splines for age")
        );
    }

    #[tokio::test]
    async fn test_revise_reruns_previous_stage() {
        let approval = Arc::new(ScriptedApproval::new(vec![
            ApprovalDecision::Approve(None),
            ApprovalDecision::Approve(None),
            ApprovalDecision::Revise,
        ]));
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::O3, "first synthesis", TokenUsage::new(1000, 0))
            .reply(ModelKey::O3, "second synthesis", TokenUsage::new(1000, 0));
        let (uc, gateway) = use_case(gateway, approval.clone());

        let output = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap();

        assert_eq!(gateway.call_count(), FULL_RUN_CALLS + 4 + 1);
        assert_eq!(output.state.planning().unwrap().synthesis, "second synthesis");
        // Both syntheses were paid for
        let one = ModelKey::O3.spec().cost(&TokenUsage::new(1000, 0));
        assert!((output.state.ledger().stage(Stage::Planning) - 2.0 * one).abs() < 1e-12);
        assert_eq!(
            &approval.asked.lock().unwrap()[..4],
            [Stage::Audit, Stage::Planning, Stage::Assumptions, Stage::Planning]
        );
    }

    #[tokio::test]
    async fn test_revise_at_audit_redoes_audit() {
        let approval = Arc::new(ScriptedApproval::new(vec![ApprovalDecision::Revise]));
        let (uc, gateway) = use_case(ScriptedGateway::new(), approval.clone());

        let output = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap();

        assert!(output.state.is_complete());
        assert_eq!(gateway.call_count(), FULL_RUN_CALLS + 1);
        assert_eq!(output.trail.decisions[0].decision, "revise");
    }

    #[tokio::test]
    async fn test_restart_keeps_credentials() {
        let approval = Arc::new(ScriptedApproval::new(vec![
            ApprovalDecision::Approve(None),
            ApprovalDecision::Restart,
        ]));
        let (uc, gateway) = use_case(ScriptedGateway::new(), approval.clone());

        let output = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap();

        assert_eq!(output.state.credentials().completion_api_key(), Some("sk-or-test"));
        assert_eq!(gateway.call_count(), FULL_RUN_CALLS + 1 + 4);
        assert_eq!(
            &approval.asked.lock().unwrap()[..3],
            [Stage::Audit, Stage::Planning, Stage::Audit]
        );
    }

    #[tokio::test]
    async fn test_abort_returns_partial_state() {
        let approval = Arc::new(ScriptedApproval::new(vec![
            ApprovalDecision::Approve(None),
            ApprovalDecision::Abort,
        ]));
        let (uc, gateway) = use_case(ScriptedGateway::new(), approval);

        let err = uc.execute(input(AnalysisMode::FullPipeline)).await.unwrap_err();

        let RunPipelineError::Aborted(partial) = err else {
            panic!("expected Aborted, got {err:?}");
        };
        assert_eq!(gateway.call_count(), 5);
        assert_eq!(partial.state.current(), Stage::Planning);
        assert!(partial.state.planning().is_some());
        assert!(partial.state.assumptions().is_none());
        assert_eq!(partial.trail.decisions.last().unwrap().decision, "abort");
    }
}
