//! Code execution port
//!
//! Runs generated analysis code against the dataset in an isolated sandbox.

use async_trait::async_trait;
use council_domain::{DataTable, ExecutionOutput};

/// Port for sandboxed code execution
///
/// Never fails: a broken run comes back as an [`ExecutionOutput`] with
/// `succeeded = false`, zero cost and the reason in `text`.
#[async_trait]
pub trait CodeExecutorPort: Send + Sync {
    async fn execute(&self, code: &str, dataset: &DataTable) -> ExecutionOutput;
}
