//! Stage 5: Adversarial Review

use super::StageOrchestrator;
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    Confidence, Conversation, Proposal, PromptTemplate, ReviewResult, Stage, assess_review,
};
use tracing::{info, warn};

/// What the reviewers are shown
#[derive(Debug, Clone, Copy)]
pub struct ReviewInputs<'a> {
    pub analysis_plan: &'a str,
    pub code: &'a str,
    pub results: &'a str,
    pub assumptions: &'a str,
}

impl<G: CompletionGateway + 'static> StageOrchestrator<G> {
    /// Stage 5: independent adversarial reviews, concatenated in reviewer order.
    ///
    /// Issue lines and confidence come from the successful reviews only.
    /// When every reviewer fails confidence is `Low`.
    pub async fn review(
        &self,
        prior: ReviewInputs<'_>,
        progress: &dyn ProgressNotifier,
    ) -> ReviewResult {
        info!("Stage 5: Adversarial Review");
        let user = PromptTemplate::adversarial_user(
            prior.analysis_plan,
            prior.code,
            prior.results,
            prior.assumptions,
        );
        let calls = self
            .config
            .review_models
            .iter()
            .map(|model| {
                (
                    *model,
                    Conversation::system_user(PromptTemplate::adversarial_system(), user.clone()),
                )
            })
            .collect();

        let results = self
            .fan_out(
                Stage::Review,
                calls,
                self.config.review_temperature,
                self.config.standard_call,
                progress,
            )
            .await;

        let combined_review = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("## Review {} ({})\n{}", i + 1, r.model().display_name(), r.text()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let successful: Vec<&str> = results.iter().filter_map(|r| r.content()).collect();
        let (issues, confidence) = if successful.is_empty() {
            warn!("Every reviewer failed");
            (None, Confidence::Low)
        } else {
            assess_review(&successful.join("\n\n"))
        };
        info!("Review confidence: {}", confidence);

        ReviewResult {
            combined_review,
            reviews: results.iter().map(Proposal::from).collect(),
            issues,
            confidence,
            cost: results.iter().map(|r| r.cost()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::CouncilConfig;
    use crate::ports::document_renderer::PlainTextRenderer;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::completion_client::CompletionClient;
    use council_domain::{ExecutionOutput, ModelKey, TokenUsage};
    use std::sync::Arc;

    fn orchestrator(gateway: ScriptedGateway) -> StageOrchestrator<ScriptedGateway> {
        StageOrchestrator::new(
            CompletionClient::new(Arc::new(gateway)),
            Arc::new(FixedExecutor::new(ExecutionOutput::failed("unused"))),
            Arc::new(PlainTextRenderer),
            CouncilConfig::default(),
        )
    }

    const PRIOR: ReviewInputs<'static> = ReviewInputs {
        analysis_plan: "plan",
        code: "print(1)",
        results: "OR 1.08",
        assumptions: "ok",
    };

    #[tokio::test]
    async fn test_reviews_combined_in_order() {
        let gateway = ScriptedGateway::new()
            .delay(ModelKey::DeepSeekV3, 40)
            .reply(ModelKey::DeepSeekV3, "Sound analysis.", TokenUsage::new(1000, 1000))
            .reply(ModelKey::DeepSeekR1, "Consider a sensitivity analysis.", TokenUsage::new(1000, 1000));

        let result = orchestrator(gateway).review(PRIOR, &NoProgress).await;

        assert_eq!(
            result.combined_review,
            "## Review 1 (DeepSeek V3.2)\nSound analysis.\n\n## Review 2 (DeepSeek R1)\nConsider a sensitivity analysis."
        );
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.issues, None);
        let expected = ModelKey::DeepSeekV3.spec().cost(&TokenUsage::new(1000, 1000))
            + ModelKey::DeepSeekR1.spec().cost(&TokenUsage::new(1000, 1000));
        assert!((result.cost - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_critical_findings_lower_confidence() {
        let gateway = ScriptedGateway::new()
            .reply(
                ModelKey::DeepSeekV3,
                "Critical: the model is invalid.\nYou MUST adjust for age.",
                TokenUsage::default(),
            )
            .reply(ModelKey::DeepSeekR1, "Fine.", TokenUsage::default());

        let result = orchestrator(gateway).review(PRIOR, &NoProgress).await;

        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.issues.as_deref(), Some("You MUST adjust for age."));
    }

    #[tokio::test]
    async fn test_failed_reviewer_text_not_scanned() {
        let gateway = ScriptedGateway::new()
            .fail(ModelKey::DeepSeekV3)
            .reply(ModelKey::DeepSeekR1, "All good.", TokenUsage::default());

        let result = orchestrator(gateway).review(PRIOR, &NoProgress).await;

        assert!(result.combined_review.contains("Error calling DeepSeek V3.2"));
        assert!(result.reviews[0].failed);
        assert_eq!(result.issues, None);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_all_reviewers_failed_is_low_confidence() {
        let gateway = ScriptedGateway::new()
            .fail(ModelKey::DeepSeekV3)
            .fail(ModelKey::DeepSeekR1);

        let result = orchestrator(gateway).review(PRIOR, &NoProgress).await;

        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.cost, 0.0);
    }
}
