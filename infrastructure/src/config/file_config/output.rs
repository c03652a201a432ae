//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where artifacts go and the run defaults the CLI can override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub directory: PathBuf,
    /// Journal key; unknown keys fall back to Generic
    pub journal: String,
    /// Study design label, e.g. "Retrospective Cohort"
    pub study_design: String,
    /// "full" or "quick"
    pub mode: String,
    /// Document converter binary
    pub pandoc: String,
    /// Write the JSONL conversation transcript next to the artifacts
    pub conversation_log: bool,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("stats_council_output"),
            journal: "Generic".to_string(),
            study_design: "Auto-detect".to_string(),
            mode: "full".to_string(),
            pandoc: "pandoc".to_string(),
            conversation_log: true,
            color: true,
        }
    }
}
