//! Model and temperature configuration from TOML (`[models]`, `[temperatures]`)

use super::ConfigError;
use council_application::CouncilConfig;
use council_domain::{ModelKey, Temperature};
use serde::{Deserialize, Serialize};

/// Stage-to-model assignment
///
/// # Example
///
/// ```toml
/// [models]
/// audit = "deepseek_v3"
/// council = ["deepseek_v3", "deepseek_r1", "gemini_25"]
/// synthesis = "o3"
/// assumptions = "deepseek_r1"
/// code = "o3"
/// verify = "deepseek_r1"
/// review = ["deepseek_v3", "deepseek_r1"]
/// writing = "opus"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub audit: Option<String>,
    /// Planning proposal models, in council order
    pub council: Option<Vec<String>>,
    pub synthesis: Option<String>,
    pub assumptions: Option<String>,
    pub code: Option<String>,
    pub verify: Option<String>,
    /// Adversarial reviewers, in review order
    pub review: Option<Vec<String>>,
    pub writing: Option<String>,
}

fn parse_model(field: &str, value: &str) -> Result<ModelKey, ConfigError> {
    value.parse().map_err(|_| ConfigError::UnknownModel {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_list(field: &str, values: &[String]) -> Result<Vec<ModelKey>, ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::EmptyModelList(field.to_string()));
    }
    let mut models = Vec::with_capacity(values.len());
    for value in values {
        let model = parse_model(field, value)?;
        if models.contains(&model) {
            return Err(ConfigError::DuplicateModel {
                field: field.to_string(),
                value: value.clone(),
            });
        }
        models.push(model);
    }
    Ok(models)
}

impl FileModelsConfig {
    pub(super) fn apply(&self, config: &mut CouncilConfig) -> Result<(), ConfigError> {
        let singles = [
            ("audit", &self.audit, &mut config.audit_model),
            ("synthesis", &self.synthesis, &mut config.synthesis_model),
            ("assumptions", &self.assumptions, &mut config.assumptions_model),
            ("code", &self.code, &mut config.code_model),
            ("verify", &self.verify, &mut config.verify_model),
            ("writing", &self.writing, &mut config.writing_model),
        ];
        for (field, value, slot) in singles {
            if let Some(value) = value {
                *slot = parse_model(field, value)?;
            }
        }
        if let Some(council) = &self.council {
            config.council_models = parse_list("council", council)?;
        }
        if let Some(review) = &self.review {
            config.review_models = parse_list("review", review)?;
        }
        Ok(())
    }
}

/// Sampling temperatures
///
/// ```toml
/// [temperatures]
/// analytical = 0.1   # audit, planning, assumptions, verification
/// code = 0.0
/// review = 0.7
/// writing = 0.3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTemperaturesConfig {
    pub analytical: Option<f32>,
    pub code: Option<f32>,
    pub review: Option<f32>,
    pub writing: Option<f32>,
}

impl FileTemperaturesConfig {
    pub(super) fn apply(&self, config: &mut CouncilConfig) -> Result<(), ConfigError> {
        let fields = [
            ("analytical", self.analytical, &mut config.analytical_temperature),
            ("code", self.code, &mut config.code_temperature),
            ("review", self.review, &mut config.review_temperature),
            ("writing", self.writing, &mut config.writing_temperature),
        ];
        for (field, value, slot) in fields {
            if let Some(value) = value {
                *slot = Temperature::new(value).map_err(|_| ConfigError::InvalidTemperature {
                    field: field.to_string(),
                    value,
                })?;
            }
        }
        Ok(())
    }
}
