//! Pandoc-backed document renderer.

use super::markdown::manuscript_markdown;
use async_trait::async_trait;
use council_application::ports::document_renderer::DocumentRenderer;
use council_domain::{DataTable, DocumentArtifact, JournalFormat, ManuscriptSections};
use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// Pandoc gets this long before the renderer falls back to plain text
const PANDOC_TIMEOUT: Duration = Duration::from_secs(60);

/// Renders the manuscript to `.docx` through `pandoc`
///
/// Any failure (binary missing, non-zero exit, timeout) produces the
/// plain-text fallback instead of an error.
pub struct PandocRenderer {
    pandoc: String,
    extension: String,
}

impl PandocRenderer {
    pub fn new(pandoc: impl Into<String>) -> Self {
        Self {
            pandoc: pandoc.into(),
            extension: "docx".to_string(),
        }
    }

    async fn convert(&self, markdown: &str) -> Result<Vec<u8>, String> {
        let workdir = tempfile::tempdir().map_err(|e| e.to_string())?;
        let input = workdir.path().join("manuscript.md");
        let output = workdir.path().join(format!("manuscript.{}", self.extension));
        tokio::fs::write(&input, markdown)
            .await
            .map_err(|e| e.to_string())?;

        let run = Command::new(&self.pandoc)
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();
        let result = tokio::time::timeout(PANDOC_TIMEOUT, run)
            .await
            .map_err(|_| format!("{} timed out", self.pandoc))?
            .map_err(|e| format!("could not run {}: {e}", self.pandoc))?;

        if !result.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.pandoc,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }
        tokio::fs::read(&output).await.map_err(|e| e.to_string())
    }
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

#[async_trait]
impl DocumentRenderer for PandocRenderer {
    async fn render(
        &self,
        sections: &ManuscriptSections,
        tables: &BTreeMap<String, DataTable>,
        journal: &JournalFormat,
    ) -> DocumentArtifact {
        let markdown = manuscript_markdown(sections, tables, journal);
        match self.convert(&markdown).await {
            Ok(bytes) => {
                info!("Rendered manuscript ({} bytes)", bytes.len());
                DocumentArtifact::Binary {
                    extension: self.extension.clone(),
                    bytes,
                }
            }
            Err(e) => {
                warn!("Document rendering failed, using plain text: {}", e);
                DocumentArtifact::PlainText {
                    text: sections.to_plain_text(),
                }
            }
        }
    }
}
