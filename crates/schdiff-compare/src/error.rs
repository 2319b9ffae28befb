//! Comparison errors

use std::path::PathBuf;

use schdiff_core::SchError;
use schdiff_storage::StoreError;
use thiserror::Error;

/// Errors that can occur while comparing or handling reports
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Schema(#[from] SchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("report file not found: {}", .0.display())]
    ReportNotFound(PathBuf),

    #[error("invalid report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;
