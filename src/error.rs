//! Error types shared across the widget and the knowledge base.

use std::path::PathBuf;

/// Failures of a single chat round-trip.
///
/// The widget collapses every variant into the same fallback bubble; the
/// variants only exist so the cause can be logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The request could not be completed at the transport level.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The endpoint answered with a non-success status.
    #[error("server error: HTTP {status}")]
    ServerError {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },

    /// The body was not JSON or did not carry a `reply` string.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while loading the symptom knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// A required data file does not exist.
    #[error("data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A data file exists but holds no header row.
    #[error("data file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// A data file lacks a column the loader needs.
    #[error("{file}: missing column '{column}'")]
    MissingColumn {
        /// File name (without directory).
        file: String,
        /// Column header that was expected.
        column: String,
    },

    /// A record could not be parsed.
    #[error("{file}:{line}: {reason}")]
    Csv {
        /// File name (without directory).
        file: String,
        /// 1-based line number of the offending record.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// An I/O error occurred while reading a data file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
