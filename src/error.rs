//! Error type shared by the ETL library modules.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while transforming and loading a data file.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record in {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: i64, reason: String },

    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl EtlError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        EtlError::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Whether the error is confined to the content of a single file.
    ///
    /// These are the only errors a run may recover from by skipping the file,
    /// I/O and database failures always abort.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            EtlError::Parse { .. } | EtlError::InvalidTimestamp { .. }
        )
    }
}
