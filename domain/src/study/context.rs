//! Research framing supplied by the user

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Study design, which determines the reporting guideline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyDesign {
    #[default]
    #[serde(rename = "Auto-detect")]
    AutoDetect,
    #[serde(rename = "Retrospective Cohort")]
    RetrospectiveCohort,
    #[serde(rename = "Prospective Cohort")]
    ProspectiveCohort,
    #[serde(rename = "Case-Control")]
    CaseControl,
    #[serde(rename = "Cross-sectional")]
    CrossSectional,
    #[serde(rename = "RCT")]
    Rct,
    #[serde(rename = "Case Series")]
    CaseSeries,
    #[serde(rename = "Prediction Model")]
    PredictionModel,
}

impl StudyDesign {
    pub const ALL: [StudyDesign; 8] = [
        StudyDesign::AutoDetect,
        StudyDesign::RetrospectiveCohort,
        StudyDesign::ProspectiveCohort,
        StudyDesign::CaseControl,
        StudyDesign::CrossSectional,
        StudyDesign::Rct,
        StudyDesign::CaseSeries,
        StudyDesign::PredictionModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyDesign::AutoDetect => "Auto-detect",
            StudyDesign::RetrospectiveCohort => "Retrospective Cohort",
            StudyDesign::ProspectiveCohort => "Prospective Cohort",
            StudyDesign::CaseControl => "Case-Control",
            StudyDesign::CrossSectional => "Cross-sectional",
            StudyDesign::Rct => "RCT",
            StudyDesign::CaseSeries => "Case Series",
            StudyDesign::PredictionModel => "Prediction Model",
        }
    }

    /// Reporting guideline named in the writing prompts
    pub fn reporting_guideline(&self) -> &'static str {
        match self {
            StudyDesign::RetrospectiveCohort => {
                "STROBE (Strengthening the Reporting of Observational Studies in Epidemiology)"
            }
            StudyDesign::Rct => "CONSORT (Consolidated Standards of Reporting Trials)",
            StudyDesign::CaseSeries => "CARE (Case Report Guidelines)",
            StudyDesign::PredictionModel => {
                "TRIPOD (Transparent Reporting of a Multivariable Prediction Model)"
            }
            StudyDesign::AutoDetect
            | StudyDesign::ProspectiveCohort
            | StudyDesign::CaseControl
            | StudyDesign::CrossSectional => "STROBE",
        }
    }

    /// Guideline for a free-form design label; unknown labels get STROBE
    pub fn guideline_for(label: &str) -> &'static str {
        label
            .parse::<StudyDesign>()
            .map(|d| d.reporting_guideline())
            .unwrap_or("STROBE")
    }
}

impl fmt::Display for StudyDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyDesign {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        StudyDesign::ALL
            .into_iter()
            .find(|d| normalize(d.as_str()) == wanted)
            .ok_or_else(|| DomainError::UnknownStudyDesign(s.to_string()))
    }
}

/// Lowercase with separators dropped, so `case-control` matches `Case-Control`
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// How much human supervision the run gets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Every stage waits at an approval gate
    #[default]
    FullPipeline,
    /// All gates are approved automatically
    QuickAnalysis,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::FullPipeline => "full_pipeline",
            AnalysisMode::QuickAnalysis => "quick_analysis",
        }
    }

    pub fn auto_approves(&self) -> bool {
        matches!(self, AnalysisMode::QuickAnalysis)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "full" | "fullpipeline" => Ok(AnalysisMode::FullPipeline),
            "quick" | "quickanalysis" => Ok(AnalysisMode::QuickAnalysis),
            _ => Err(DomainError::UnknownAnalysisMode(s.to_string())),
        }
    }
}

/// Everything the user tells the council about the study
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchContext {
    pub research_question: String,
    pub outcome_var: String,
    pub exposure_var: String,
    /// Comma-separated covariate names, free text
    pub covariates: String,
    pub hypotheses: String,
    pub study_design: StudyDesign,
    /// Journal key, resolved through [`super::JournalFormat::lookup`]
    pub journal: String,
}

impl ResearchContext {
    pub fn new(
        research_question: impl Into<String>,
        outcome_var: impl Into<String>,
        exposure_var: impl Into<String>,
    ) -> Self {
        Self {
            research_question: research_question.into(),
            outcome_var: outcome_var.into(),
            exposure_var: exposure_var.into(),
            journal: "Generic".to_string(),
            ..Default::default()
        }
    }

    pub fn with_covariates(mut self, covariates: impl Into<String>) -> Self {
        self.covariates = covariates.into();
        self
    }

    pub fn with_hypotheses(mut self, hypotheses: impl Into<String>) -> Self {
        self.hypotheses = hypotheses.into();
        self
    }

    pub fn with_design(mut self, design: StudyDesign) -> Self {
        self.study_design = design;
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = journal.into();
        self
    }

    pub fn journal_format(&self) -> &'static super::JournalFormat {
        super::JournalFormat::lookup(&self.journal)
    }

    /// Names of variables the dataset must contain
    pub fn required_columns(&self) -> Vec<&str> {
        [self.outcome_var.as_str(), self.exposure_var.as_str()]
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect()
    }
}
