//! Errors surfaced to callers of the list processor.

use std::time::Duration;
use thiserror::Error;

/// Message sent back for a request whose `type` is not a known operation.
pub const UNKNOWN_OPERATION: &str = "Unknown operation type";

#[derive(Error, Debug)]
pub enum ProcessorError {
    /// The request named an operation the processor does not have.
    #[error("Unknown operation type")]
    UnknownOperation,

    /// The operation ran and failed. Carries the failure's message text.
    #[error("{0}")]
    ComputationFailure(String),

    /// No response arrived within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The processor thread is gone, so the request cannot be delivered or answered.
    #[error("List processor is closed")]
    Closed,

    #[error("Failed to spawn list processor thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A payload or result could not be converted to or from JSON.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ProcessorError {
    /// Rebuild the typed error from the string carried on the wire.
    pub fn from_wire(message: String) -> Self {
        if message == UNKNOWN_OPERATION {
            ProcessorError::UnknownOperation
        } else {
            ProcessorError::ComputationFailure(message)
        }
    }
}
