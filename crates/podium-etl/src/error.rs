//! Error types for the load and reconcile pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading sources or writing the store.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A tabular source could not be read or decoded.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A tabular source lacks a column the pipeline needs.
    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },

    /// An error propagated from the core domain layer (including
    /// constraint violations raised by the record loader).
    #[error("database error: {0}")]
    Database(#[from] podium_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workflow engine or its state store failed.
    #[error("workflow error: {0}")]
    Workflow(#[from] treadle::TreadleError),

    /// A pipeline stage ran and failed, or never ran because an earlier
    /// stage failed.
    #[error("stage `{stage}` did not complete: {message}")]
    StageFailed { stage: String, message: String },
}

impl EtlError {
    /// Returns `true` when a loaded record broke a relation's constraints.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(podium_core::Error::MissingField { .. })
        ) || matches!(
            self,
            Self::Database(podium_core::Error::Database(rusqlite_err))
                if rusqlite_err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
        )
    }
}

/// Convenience alias for pipeline results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
