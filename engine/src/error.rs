//! Error types for engine operations.
//!
//! Provides a unified error type covering connection lifecycle, statement
//! execution, URI parsing, and cursor access failures.

use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File system failure (e.g., creating the database directory tree).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database URI string could not be parsed.
    #[error("invalid database URI '{uri}': {reason}")]
    InvalidUri {
        /// The URI string that failed to parse.
        uri: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Fetch attempted on a cursor that has already been closed.
    #[error("cannot operate on a closed cursor")]
    CursorClosed,
}

/// Convenience alias for results with [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
