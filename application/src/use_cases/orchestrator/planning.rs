//! Stage 2: Planning Council

use super::{StageOrchestrator, StudyInputs};
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    CompletionResult, Conversation, PlanningResult, PromptTemplate, Proposal, Stage,
    extract_disagreements,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

/// `{display name: proposal}` serialized in council order
struct CouncilPlans<'a>(Vec<(&'a str, &'a str)>);

impl Serialize for CouncilPlans<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, plan) in &self.0 {
            map.serialize_entry(name, plan)?;
        }
        map.end()
    }
}

impl<G: CompletionGateway + 'static> StageOrchestrator<G> {
    /// Stage 2: independent proposals, then one synthesis.
    ///
    /// Every council member gets the identical context. Failed proposals
    /// are kept for display but left out of the synthesis input.
    pub async fn planning(
        &self,
        inputs: &StudyInputs,
        data_audit: &str,
        progress: &dyn ProgressNotifier,
    ) -> PlanningResult {
        info!(
            "Stage 2: Planning Council with {} models",
            self.config.council_models.len()
        );
        let context =
            PromptTemplate::planning_context(inputs.data_summary(), data_audit, &inputs.context);
        let calls = self
            .config
            .council_models
            .iter()
            .map(|model| {
                (
                    *model,
                    Conversation::system_user(PromptTemplate::planning_system(), context.clone()),
                )
            })
            .collect();

        let results = self
            .fan_out(
                Stage::Planning,
                calls,
                self.config.analytical_temperature,
                self.config.standard_call,
                progress,
            )
            .await;

        let plans = council_plans_json(&results);
        let synthesis = self
            .call(
                Stage::Planning,
                self.config.synthesis_model,
                Conversation::system_user(
                    PromptTemplate::synthesis_system(),
                    PromptTemplate::synthesis_user(&plans, &inputs.context.research_question),
                ),
                self.config.analytical_temperature,
                self.config.standard_call,
                progress,
            )
            .await;

        let disagreements = synthesis.content().and_then(extract_disagreements);
        let cost = results.iter().map(CompletionResult::cost).sum::<f64>() + synthesis.cost();

        PlanningResult {
            proposals: results.iter().map(Proposal::from).collect(),
            synthesis: synthesis.text(),
            synthesis_failed: synthesis.is_failure(),
            disagreements,
            cost,
        }
    }
}

/// Pretty JSON of the successful proposals, keyed by display name
fn council_plans_json(results: &[CompletionResult]) -> String {
    let plans = CouncilPlans(
        results
            .iter()
            .filter_map(|r| r.content().map(|text| (r.model().display_name(), text)))
            .collect(),
    );
    if plans.0.is_empty() {
        warn!("Every council proposal failed; synthesizing from an empty set");
    }
    serde_json::to_string_pretty(&plans).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::CouncilConfig;
    use crate::ports::document_renderer::PlainTextRenderer;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::completion_client::CompletionClient;
    use council_domain::{ExecutionOutput, ModelKey, ResearchContext, TokenUsage};
    use std::sync::Arc;

    fn run_with(gateway: ScriptedGateway) -> (StageOrchestrator<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        let orch = StageOrchestrator::new(
            CompletionClient::new(Arc::clone(&gateway)),
            Arc::new(FixedExecutor::new(ExecutionOutput::failed("unused"))),
            Arc::new(PlainTextRenderer),
            CouncilConfig::default(),
        );
        (orch, gateway)
    }

    fn inputs() -> StudyInputs {
        StudyInputs::new(
            sample_dataset(),
            ResearchContext::new("Does BMI predict complications?", "complication", "bmi")
                .with_covariates("age"),
        )
    }

    #[tokio::test]
    async fn test_planning_makes_four_calls_and_sums_cost() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::DeepSeekV3, "Use logistic regression.", TokenUsage::new(3000, 800))
            .reply(ModelKey::DeepSeekR1, "Logistic regression with splines.", TokenUsage::new(3000, 1500))
            .reply(ModelKey::Gemini25Pro, "Logistic regression, adjust for age.", TokenUsage::new(3000, 1200))
            .reply(ModelKey::O3, "## Unified plan\nLogistic regression adjusted for age.", TokenUsage::new(5000, 900));
        let (orch, gateway) = run_with(gateway);

        let result = orch.planning(&inputs(), "audit ok", &NoProgress).await;

        assert_eq!(gateway.call_count(), 4);
        let expected = [
            ModelKey::DeepSeekV3.spec().cost(&TokenUsage::new(3000, 800)),
            ModelKey::DeepSeekR1.spec().cost(&TokenUsage::new(3000, 1500)),
            ModelKey::Gemini25Pro.spec().cost(&TokenUsage::new(3000, 1200)),
            ModelKey::O3.spec().cost(&TokenUsage::new(5000, 900)),
        ]
        .iter()
        .sum::<f64>();
        assert!((result.cost - expected).abs() < 1e-12);
        assert!(result.synthesis.starts_with("## Unified plan"));
        assert_eq!(result.disagreements, None);
        assert!(!result.synthesis_failed);
    }

    #[tokio::test]
    async fn test_proposals_keep_council_order_regardless_of_latency() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::DeepSeekV3, "plan A", TokenUsage::default())
            .reply(ModelKey::DeepSeekR1, "plan B", TokenUsage::default())
            .reply(ModelKey::Gemini25Pro, "plan C", TokenUsage::default())
            .delay(ModelKey::DeepSeekV3, 60)
            .delay(ModelKey::DeepSeekR1, 30);
        let (orch, gateway) = run_with(gateway);

        let result = orch.planning(&inputs(), "audit", &NoProgress).await;

        let models: Vec<ModelKey> = result.proposals.iter().map(|p| p.model).collect();
        assert_eq!(
            models,
            vec![ModelKey::DeepSeekV3, ModelKey::DeepSeekR1, ModelKey::Gemini25Pro]
        );
        // the synthesis prompt lists plans in council order too
        let synthesis_prompt = gateway.user_prompt(3);
        let a = synthesis_prompt.find("\"DeepSeek V3.2\": \"plan A\"").unwrap();
        let b = synthesis_prompt.find("\"DeepSeek R1\": \"plan B\"").unwrap();
        let c = synthesis_prompt.find("\"Gemini 2.5 Pro\": \"plan C\"").unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_failed_proposal_excluded_from_synthesis() {
        let gateway = ScriptedGateway::new()
            .reply(ModelKey::DeepSeekV3, "plan A", TokenUsage::default())
            .fail(ModelKey::DeepSeekR1)
            .reply(ModelKey::Gemini25Pro, "plan C", TokenUsage::default());
        let (orch, gateway) = run_with(gateway);

        let result = orch.planning(&inputs(), "audit", &NoProgress).await;

        assert!(result.proposals[1].failed);
        assert!(result.proposals[1].text.starts_with("Error calling DeepSeek R1"));
        let synthesis_prompt = gateway.user_prompt(3);
        assert!(!synthesis_prompt.contains("DeepSeek R1"));
        assert!(!synthesis_prompt.contains("Error calling"));
    }

    #[tokio::test]
    async fn test_failed_synthesis_has_no_disagreements() {
        let gateway = ScriptedGateway::new().fail(ModelKey::O3);
        let (orch, _) = run_with(gateway);

        let result = orch.planning(&inputs(), "audit", &NoProgress).await;

        assert!(result.synthesis_failed);
        assert_eq!(result.disagreements, None);
        assert!(result.synthesis.starts_with("Error calling OpenAI o3"));
    }

    #[tokio::test]
    async fn test_disagreements_extracted_from_synthesis() {
        let gateway = ScriptedGateway::new().reply(
            ModelKey::O3,
            "## Plan\nLogistic\n\n## Disagreements Resolved\n- R1 wanted splines\n- V3 did not\n- chose splines\n\n## Final",
            TokenUsage::default(),
        );
        let (orch, _) = run_with(gateway);

        let result = orch.planning(&inputs(), "audit", &NoProgress).await;

        let disagreements = result.disagreements.unwrap();
        assert!(disagreements.starts_with("## Disagreements Resolved"));
        assert!(!disagreements.contains("## Final"));
    }
}
