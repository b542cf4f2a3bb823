//! Off-thread list processing.
//!
//! A [`ListProcessor`] owns one background thread and answers
//! `SEARCH_AND_FILTER`, `SEARCH_POSTS` and `FILTER_POSTS` requests sent as
//! correlated JSON envelopes. [`ProcessorClient`] is the async caller side:
//! it assigns ids, waits for matching responses and applies the optional
//! request timeout.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod processor;
pub mod protocol;

pub use client::ProcessorClient;
pub use config::ProcessorConfig;
pub use dispatch::{OperationKind, handle_request};
pub use error::{ProcessorError, UNKNOWN_OPERATION};
pub use processor::ListProcessor;
pub use protocol::{CorrelationId, Outcome, RequestEnvelope, ResponseEnvelope};
