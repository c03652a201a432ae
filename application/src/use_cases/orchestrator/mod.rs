//! Stage orchestrator
//!
//! Runs the per-stage algorithms: which models are called with which
//! prompts, how their answers are combined and what each stage costs.
//! It does not check approval gates; [`PipelineState::begin`] owns that and
//! the run-pipeline use case consults it before calling in here.
//!
//! [`PipelineState::begin`]: council_domain::PipelineState::begin

mod execution;
mod planning;
mod review;
mod writing;

pub use execution::ExecutionInputs;
pub use review::ReviewInputs;

use super::completion_client::CompletionClient;
use crate::config::{CallProfile, CouncilConfig};
use crate::ports::code_executor::CodeExecutorPort;
use crate::ports::document_renderer::DocumentRenderer;
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    AssumptionsResult, AuditResult, CompletionResult, Conversation, DataTable, ModelKey,
    PromptTemplate, ResearchContext, Stage, Temperature,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// The dataset and research framing shared by every stage
#[derive(Debug, Clone)]
pub struct StudyInputs {
    pub dataset: Arc<DataTable>,
    pub context: ResearchContext,
    data_summary: String,
}

impl StudyInputs {
    pub fn new(dataset: DataTable, context: ResearchContext) -> Self {
        let data_summary = dataset.profile().summary_text();
        Self {
            dataset: Arc::new(dataset),
            context,
            data_summary,
        }
    }

    /// Dataset summary text handed to the models
    pub fn data_summary(&self) -> &str {
        &self.data_summary
    }
}

/// Runs individual stages against the configured models and collaborators
pub struct StageOrchestrator<G: CompletionGateway + 'static> {
    client: CompletionClient<G>,
    executor: Arc<dyn CodeExecutorPort>,
    renderer: Arc<dyn DocumentRenderer>,
    config: CouncilConfig,
}

impl<G: CompletionGateway + 'static> StageOrchestrator<G> {
    pub fn new(
        client: CompletionClient<G>,
        executor: Arc<dyn CodeExecutorPort>,
        renderer: Arc<dyn DocumentRenderer>,
        config: CouncilConfig,
    ) -> Self {
        Self {
            client,
            executor,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &CouncilConfig {
        &self.config
    }

    /// Stage 1: data audit by a single model
    pub async fn audit(
        &self,
        inputs: &StudyInputs,
        progress: &dyn ProgressNotifier,
    ) -> AuditResult {
        info!("Stage 1: Data Audit");
        let conversation = Conversation::system_user(
            PromptTemplate::audit_system(),
            PromptTemplate::audit_user(inputs.data_summary(), &inputs.context),
        );
        let result = self
            .call(
                Stage::Audit,
                self.config.audit_model,
                conversation,
                self.config.analytical_temperature,
                self.config.standard_call,
                progress,
            )
            .await;
        AuditResult {
            report: result.text(),
            cost: result.cost(),
        }
    }

    /// Stage 3: assumption verification of the synthesized plan
    pub async fn assumptions(
        &self,
        inputs: &StudyInputs,
        analysis_plan: &str,
        user_modifications: &str,
        progress: &dyn ProgressNotifier,
    ) -> AssumptionsResult {
        info!("Stage 3: Assumption Verification");
        let conversation = Conversation::system_user(
            PromptTemplate::assumptions_system(),
            PromptTemplate::assumptions_user(
                inputs.data_summary(),
                analysis_plan,
                user_modifications,
            ),
        );
        let result = self
            .call(
                Stage::Assumptions,
                self.config.assumptions_model,
                conversation,
                self.config.analytical_temperature,
                self.config.standard_call,
                progress,
            )
            .await;
        AssumptionsResult {
            report: result.text(),
            cost: result.cost(),
        }
    }

    /// One call, reported to progress
    async fn call(
        &self,
        stage: Stage,
        model: ModelKey,
        conversation: Conversation,
        temperature: Temperature,
        profile: CallProfile,
        progress: &dyn ProgressNotifier,
    ) -> CompletionResult {
        let result = self
            .client
            .complete(model, conversation, temperature, profile)
            .await;
        progress.on_call_complete(stage, model, !result.is_failure());
        result
    }

    /// Run independent calls concurrently.
    ///
    /// Results come back in slot order, whatever order the calls finish in.
    async fn fan_out(
        &self,
        stage: Stage,
        calls: Vec<(ModelKey, Conversation)>,
        temperature: Temperature,
        profile: CallProfile,
        progress: &dyn ProgressNotifier,
    ) -> Vec<CompletionResult> {
        let models: Vec<ModelKey> = calls.iter().map(|(m, _)| *m).collect();
        let mut join_set = JoinSet::new();

        for (slot, (model, conversation)) in calls.into_iter().enumerate() {
            let client = self.client.clone();
            join_set.spawn(async move {
                let result = client
                    .complete(model, conversation, temperature, profile)
                    .await;
                (slot, result)
            });
        }

        let mut slots: Vec<Option<CompletionResult>> = vec![None; models.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, result)) => {
                    progress.on_call_complete(stage, result.model(), !result.is_failure());
                    slots[slot] = Some(result);
                }
                Err(e) => warn!("Task join error: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(models)
            .map(|(result, model)| {
                result.unwrap_or_else(|| CompletionResult::Failure {
                    model,
                    error: "task did not complete".to_string(),
                })
            })
            .collect()
    }
}
