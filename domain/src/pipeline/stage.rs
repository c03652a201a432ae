use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the fixed stage sequence
///
/// Ordering follows the pipeline: `Audit < Planning < ... < Complete`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Audit,
    Planning,
    Assumptions,
    Execution,
    Review,
    Writing,
    Complete,
}

impl Stage {
    /// Stages that produce output, in order
    pub const WORK: [Stage; 6] = [
        Stage::Audit,
        Stage::Planning,
        Stage::Assumptions,
        Stage::Execution,
        Stage::Review,
        Stage::Writing,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Audit => Some(Stage::Planning),
            Stage::Planning => Some(Stage::Assumptions),
            Stage::Assumptions => Some(Stage::Execution),
            Stage::Execution => Some(Stage::Review),
            Stage::Review => Some(Stage::Writing),
            Stage::Writing => Some(Stage::Complete),
            Stage::Complete => None,
        }
    }

    pub fn prev(&self) -> Option<Stage> {
        match self {
            Stage::Audit => None,
            Stage::Planning => Some(Stage::Audit),
            Stage::Assumptions => Some(Stage::Planning),
            Stage::Execution => Some(Stage::Assumptions),
            Stage::Review => Some(Stage::Execution),
            Stage::Writing => Some(Stage::Review),
            Stage::Complete => Some(Stage::Writing),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Audit => "audit",
            Stage::Planning => "planning",
            Stage::Assumptions => "assumptions",
            Stage::Execution => "execution",
            Stage::Review => "review",
            Stage::Writing => "writing",
            Stage::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Audit => "Data Audit",
            Stage::Planning => "Planning Council",
            Stage::Assumptions => "Assumption Verification",
            Stage::Execution => "Code Generation & Execution",
            Stage::Review => "Adversarial Review",
            Stage::Writing => "Results Writing",
            Stage::Complete => "Complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
