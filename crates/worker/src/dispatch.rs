//! Operation dispatch.
//!
//! Maps each operation name to a pure handler with a typed payload. Handlers
//! never share state, and [`handle_request`] turns every failure, panics
//! included, into an error response instead of letting it reach the caller.

use anyhow::{Context, Result};
use pipeline::{FilterCriteria, filter_posts, search_and_filter, search_posts};
use records::ListRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

use crate::error::UNKNOWN_OPERATION;
use crate::protocol::{RequestEnvelope, ResponseEnvelope};

/// A handler decodes its payload, runs the operation and encodes the result.
pub type Handler = fn(Value) -> Result<Value>;

/// The operations the processor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    SearchAndFilter,
    SearchPosts,
    FilterPosts,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::SearchAndFilter,
        OperationKind::SearchPosts,
        OperationKind::FilterPosts,
    ];

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_wire() == name)
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            OperationKind::SearchAndFilter => "SEARCH_AND_FILTER",
            OperationKind::SearchPosts => "SEARCH_POSTS",
            OperationKind::FilterPosts => "FILTER_POSTS",
        }
    }

    pub fn handler(self) -> Handler {
        match self {
            OperationKind::SearchAndFilter => handle_search_and_filter,
            OperationKind::SearchPosts => handle_search_posts,
            OperationKind::FilterPosts => handle_filter_posts,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAndFilterPayload {
    pub data: Vec<ListRecord>,
    #[serde(default)]
    pub filters: FilterCriteria,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPostsPayload {
    pub posts: Vec<ListRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterPostsPayload {
    pub posts: Vec<ListRecord>,
    #[serde(default)]
    pub filters: Value,
}

// =============================================================================
// Handlers
// =============================================================================

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    Ok(serde_json::from_value(payload)?)
}

fn encode(records: Vec<ListRecord>) -> Result<Value> {
    serde_json::to_value(records).context("Failed to encode result records")
}

fn handle_search_and_filter(payload: Value) -> Result<Value> {
    let SearchAndFilterPayload { data, filters } = decode(payload)?;
    encode(search_and_filter(data, &filters)?)
}

fn handle_search_posts(payload: Value) -> Result<Value> {
    let SearchPostsPayload { posts, search_term } = decode(payload)?;
    encode(search_posts(posts, search_term.as_deref())?)
}

fn handle_filter_posts(payload: Value) -> Result<Value> {
    let FilterPostsPayload { posts, filters } = decode(payload)?;
    encode(filter_posts(posts, &filters))
}

/// Answer one request. Always produces exactly one response.
pub fn handle_request(request: RequestEnvelope) -> ResponseEnvelope {
    let RequestEnvelope { id, data } = request;

    let Some(kind) = data.operation_name().and_then(OperationKind::from_wire) else {
        warn!(%id, kind = ?data.kind, "Rejecting unknown operation");
        return ResponseEnvelope::error(id, UNKNOWN_OPERATION);
    };

    debug!(%id, operation = kind.as_wire(), "Handling request");
    let handler = kind.handler();
    match catch_unwind(AssertUnwindSafe(|| handler(data.payload))) {
        Ok(Ok(result)) => ResponseEnvelope::data(id, result),
        Ok(Err(err)) => {
            warn!(%id, operation = kind.as_wire(), "Operation failed: {:#}", err);
            ResponseEnvelope::error(id, err.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!(%id, operation = kind.as_wire(), "Operation panicked: {}", message);
            ResponseEnvelope::error(id, message)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "List processor panicked".to_string()
    }
}
