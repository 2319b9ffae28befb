//! Error types for schema file parsing

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a `.sch` file
#[derive(Error, Debug)]
pub enum SchError {
    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read schema file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("duplicate column '{column}' in table '{table}' at line {line}")]
    DuplicateColumn {
        table: String,
        column: String,
        line: usize,
    },

    #[error(
        "column '{column}' in table '{table}' at line {line} reuses position {position} of '{existing}'"
    )]
    DuplicatePosition {
        table: String,
        column: String,
        existing: String,
        position: String,
        line: usize,
    },
}

impl SchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Result type alias for schema file operations
pub type SchResult<T> = std::result::Result<T, SchError>;
