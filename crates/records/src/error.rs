//! Error types for the records crate.
//!
//! Loading listing batches can fail for a handful of reasons: the file is
//! missing, the bytes are not JSON, or the JSON is not shaped like a batch.
//! Individual record fields never fail to load; see [`crate::values`].

use thiserror::Error;

/// Errors that can occur while loading listing records
#[derive(Error, Debug)]
pub enum RecordsError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not valid JSON, or a record could not be decoded
    #[error("Malformed JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The JSON parsed but is neither an array nor an object wrapping one
    #[error("Unexpected document shape: {0}")]
    InvalidShape(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecordsError>;
