//! Writes run artifacts to the output directory

use council_application::AuditTrail;
use council_domain::PipelineState;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize the audit trail: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Exports whatever the run produced into one directory
///
/// Layout:
///
/// ```text
/// <dir>/methods_results.docx   (or .txt when the converter was unavailable)
/// <dir>/analysis.py
/// <dir>/figure_1.png ...
/// <dir>/<table>.csv ...
/// <dir>/audit_trail.json
/// ```
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every artifact present in `state` plus the audit trail.
    ///
    /// Returns the written paths in write order.
    pub fn write_all(
        &self,
        state: &PipelineState,
        trail: &AuditTrail,
    ) -> Result<Vec<PathBuf>, ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::new();

        if let Some(writing) = state.writing() {
            let name = format!("methods_results.{}", writing.document.extension());
            written.push(self.write(&name, writing.document.bytes())?);
        }

        if let Some(execution) = state.execution() {
            if !execution.code.trim().is_empty() {
                written.push(self.write("analysis.py", execution.code.as_bytes())?);
            }
            for (i, figure) in execution.output.figures.iter().enumerate() {
                written.push(self.write(&format!("figure_{}.png", i + 1), figure)?);
            }
            for (name, table) in &execution.output.tables {
                let file = format!("{}.csv", file_stem(name));
                written.push(self.write(&file, table.to_csv().as_bytes())?);
            }
        }

        written.push(self.write("audit_trail.json", trail.to_json()?.as_bytes())?);

        info!("Wrote {} artifacts to {}", written.len(), self.dir.display());
        Ok(written)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ArtifactError> {
        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keep table names from escaping the output directory
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "table".to_string()
    } else {
        stem
    }
}
