//! Local Python sandbox.
//!
//! Layout of one run's working directory:
//!
//! ```text
//! <tempdir>/
//!   data.csv        dataset, written before the run
//!   analysis.py     generated code
//!   figure_1.png    collected, in file-name order
//!   table_1.csv     collected as a table named "table_1"
//!   results_table.csv
//! ```
//!
//! The directory is removed when the run finishes.

use async_trait::async_trait;
use council_application::ports::code_executor::CodeExecutorPort;
use council_domain::{DataTable, ExecutionOutput};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

const DATA_FILE: &str = "data.csv";
const SCRIPT_FILE: &str = "analysis.py";
const RESULTS_TABLE: &str = "results_table.csv";

/// Interpreter, time limit and the cost charged per successful run
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxSettings {
    pub python: String,
    pub timeout: Duration,
    /// Fixed estimate charged per successful run; 0 for local execution
    pub cost_estimate: f64,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            timeout: Duration::from_secs(300),
            cost_estimate: 0.0,
        }
    }
}

#[derive(Error, Debug)]
enum SandboxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {python}: {source}")]
    Spawn {
        python: String,
        source: std::io::Error,
    },

    #[error("Script did not finish within {0:?}")]
    Timeout(Duration),
}

/// Runs analysis code with a local interpreter
pub struct LocalPythonExecutor {
    settings: SandboxSettings,
}

impl LocalPythonExecutor {
    pub fn new(settings: SandboxSettings) -> Self {
        Self { settings }
    }

    async fn run(&self, code: &str, dataset: &DataTable) -> Result<ExecutionOutput, SandboxError> {
        let workdir = tempfile::tempdir()?;
        let dir = workdir.path();
        tokio::fs::write(dir.join(DATA_FILE), dataset.to_csv()).await?;
        tokio::fs::write(dir.join(SCRIPT_FILE), code).await?;

        debug!("Running {} {} in {}", self.settings.python, SCRIPT_FILE, dir.display());
        let child = Command::new(&self.settings.python)
            .arg(SCRIPT_FILE)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                python: self.settings.python.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| SandboxError::Timeout(self.settings.timeout))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut text = stdout.into_owned();
        if !stderr.trim().is_empty() {
            if !text.is_empty() {
                text.push_str("\n--- stderr ---\n");
            }
            text.push_str(&stderr);
        }

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            warn!("Analysis script exited with status {}", code);
            return Ok(ExecutionOutput::failed(format!(
                "Script exited with status {code}\n{text}"
            )));
        }

        let figures = collect_figures(dir).await?;
        let tables = collect_tables(dir).await?;
        info!(
            "Sandbox run finished: {} figures, {} tables",
            figures.len(),
            tables.len()
        );

        Ok(ExecutionOutput {
            text,
            figures,
            tables,
            cost: self.settings.cost_estimate,
            succeeded: true,
        })
    }
}

impl Default for LocalPythonExecutor {
    fn default() -> Self {
        Self::new(SandboxSettings::default())
    }
}

#[async_trait]
impl CodeExecutorPort for LocalPythonExecutor {
    async fn execute(&self, code: &str, dataset: &DataTable) -> ExecutionOutput {
        match self.run(code, dataset).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Sandbox run failed: {}", e);
                ExecutionOutput::failed(format!("Execution error: {e}"))
            }
        }
    }
}

/// Sorted paths of the regular files in `dir`
async fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

async fn collect_figures(dir: &Path) -> std::io::Result<Vec<Vec<u8>>> {
    let mut figures = Vec::new();
    for path in list_files(dir).await? {
        if file_name(&path).to_ascii_lowercase().ends_with(".png") {
            figures.push(tokio::fs::read(&path).await?);
        }
    }
    Ok(figures)
}

fn is_table_file(name: &str) -> bool {
    name == RESULTS_TABLE || (name.starts_with("table") && name.ends_with(".csv"))
}

/// Tables keyed by file stem; unparseable files are skipped
async fn collect_tables(dir: &Path) -> std::io::Result<BTreeMap<String, DataTable>> {
    let mut tables = BTreeMap::new();
    for path in list_files(dir).await? {
        let name = file_name(&path);
        if !is_table_file(name) {
            continue;
        }
        let content = tokio::fs::read_to_string(&path).await?;
        match DataTable::parse_csv(&content) {
            Ok(table) => {
                let stem = name.trim_end_matches(".csv").to_string();
                tables.insert(stem, table);
            }
            Err(e) => warn!("Skipping table {}: {}", name, e),
        }
    }
    Ok(tables)
}
