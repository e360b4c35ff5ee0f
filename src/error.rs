//! Error types for docstream.

use thiserror::Error;

/// Error type for docstream operations.
///
/// Every variant aborts the whole stream: there is no per-row skip and no
/// automatic retry. Errors always surface as stream items, never from the
/// stream constructor.
#[derive(Error, Debug)]
pub enum Error {
    /// Statement preparation failed (malformed or unsupported filter
    /// translation).
    #[error("Failed to prepare statement: {message}")]
    Prepare {
        /// Description of what could not be translated or prepared.
        message: String,
    },

    /// Query execution failed (storage unavailable, timeout, constraint
    /// violation).
    #[error("Query execution failed: {message}")]
    Query {
        /// Error message reported by the storage layer.
        message: String,
    },

    /// A document could not be parsed or re-serialized for extended-mode
    /// injection.
    #[error("Malformed document: {0}")]
    Document(#[from] serde_json::Error),

    /// Transport-level failure surfaced by a storage backend.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for docstream operations.
pub type Result<T> = std::result::Result<T, Error>;
