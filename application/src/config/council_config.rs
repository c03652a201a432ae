//! Stage-to-model assignment.

use super::call_profile::CallProfile;
use council_domain::{ModelKey, Temperature};

/// Which models run each stage, and how.
///
/// The default reproduces the standard council:
///
/// | Stage | Models |
/// |-------|--------|
/// | Audit | DeepSeek V3 |
/// | Planning | DeepSeek V3, DeepSeek R1, Gemini 2.5 Pro, then o3 synthesis |
/// | Assumptions | DeepSeek R1 |
/// | Execution | o3 generates, DeepSeek R1 verifies |
/// | Review | DeepSeek V3, DeepSeek R1 |
/// | Writing | Claude Opus × 4 |
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    pub audit_model: ModelKey,
    /// Proposal models, in council order
    pub council_models: Vec<ModelKey>,
    pub synthesis_model: ModelKey,
    pub assumptions_model: ModelKey,
    pub code_model: ModelKey,
    pub verify_model: ModelKey,
    /// Reviewer models, in review order
    pub review_models: Vec<ModelKey>,
    pub writing_model: ModelKey,

    pub analytical_temperature: Temperature,
    pub code_temperature: Temperature,
    pub review_temperature: Temperature,
    pub writing_temperature: Temperature,

    pub standard_call: CallProfile,
    pub writing_call: CallProfile,
    /// Each table rendered into the results prompt is capped at this many chars
    pub table_summary_limit: usize,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            audit_model: ModelKey::DeepSeekV3,
            council_models: vec![
                ModelKey::DeepSeekV3,
                ModelKey::DeepSeekR1,
                ModelKey::Gemini25Pro,
            ],
            synthesis_model: ModelKey::O3,
            assumptions_model: ModelKey::DeepSeekR1,
            code_model: ModelKey::O3,
            verify_model: ModelKey::DeepSeekR1,
            review_models: vec![ModelKey::DeepSeekV3, ModelKey::DeepSeekR1],
            writing_model: ModelKey::Opus,
            analytical_temperature: Temperature::ANALYTICAL,
            code_temperature: Temperature::PRECISE,
            review_temperature: Temperature::ADVERSARIAL,
            writing_temperature: Temperature::WRITING,
            standard_call: CallProfile::STANDARD,
            writing_call: CallProfile::WRITING,
            table_summary_limit: 2000,
        }
    }
}

impl CouncilConfig {
    /// Number of completion calls each stage makes
    pub fn calls_for(&self, stage: council_domain::Stage) -> usize {
        use council_domain::Stage;
        match stage {
            Stage::Audit | Stage::Assumptions => 1,
            Stage::Planning => self.council_models.len() + 1,
            Stage::Execution => 2,
            Stage::Review => self.review_models.len(),
            Stage::Writing => 4,
            Stage::Complete => 0,
        }
    }
}
