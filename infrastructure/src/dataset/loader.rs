//! CSV dataset loader

use council_domain::{DataTable, DomainError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading the input dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid CSV: {source}")]
    Parse { path: PathBuf, source: DomainError },

    #[error("{0} has a header but no data rows")]
    Empty(PathBuf),

    #[error("Unsupported file type '{extension}' for {path}; export it as CSV")]
    Unsupported { path: PathBuf, extension: String },
}

/// Load a CSV file with a header row
pub fn load_dataset(path: &Path) -> Result<DataTable, DatasetError> {
    if let Some(extension) = path.extension().and_then(|e| e.to_str())
        && !extension.eq_ignore_ascii_case("csv")
    {
        return Err(DatasetError::Unsupported {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = DataTable::parse_csv(&text).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if table.is_empty() {
        return Err(DatasetError::Empty(path.to_path_buf()));
    }

    info!(
        "Loaded {}: {} rows × {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}
