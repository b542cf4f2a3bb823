//! The processor's message protocol.
//!
//! Request:  `{ "id": <token>, "data": { "type": "<OPERATION>", "payload": <any> } }`
//! Response: `{ "id": <token>, "data": <result> }` or `{ "id": <token>, "error": "<message>" }`
//!
//! Exactly one response is produced per request. The id is opaque to the
//! processor and only echoed back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Caller-chosen token matching a response to its request. Any JSON value
/// is accepted and echoed back as is; a missing id reads as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub Value);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => write!(f, "{}", text),
            other => write!(f, "{}", other),
        }
    }
}

impl From<u64> for CorrelationId {
    fn from(id: u64) -> Self {
        CorrelationId(Value::from(id))
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        CorrelationId(Value::from(id))
    }
}

impl From<Value> for CorrelationId {
    fn from(id: Value) -> Self {
        CorrelationId(id)
    }
}

/// The operation part of a request.
///
/// Decoding never fails: `type` is kept as whatever value was sent, so a
/// missing or non-string operation still gets an error response. A `data`
/// that is not an object reads as an empty message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct OperationMessage {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    pub payload: Value,
}

impl OperationMessage {
    /// The operation name, when `type` is a string.
    pub fn operation_name(&self) -> Option<&str> {
        self.kind.as_ref().and_then(Value::as_str)
    }
}

impl From<Value> for OperationMessage {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                kind: fields.remove("type"),
                payload: fields.remove("payload").unwrap_or_default(),
            },
            _ => Self::default(),
        }
    }
}

/// A request envelope. Must be a JSON object; both keys are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub id: CorrelationId,
    #[serde(default)]
    pub data: OperationMessage,
}

impl RequestEnvelope {
    pub fn new(id: impl Into<CorrelationId>, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            data: OperationMessage {
                kind: Some(Value::String(kind.into())),
                payload,
            },
        }
    }
}

/// Result of one request, serialized as a sibling `data` or `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Data(Value),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: CorrelationId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ResponseEnvelope {
    pub fn data(id: CorrelationId, data: Value) -> Self {
        Self {
            id,
            outcome: Outcome::Data(data),
        }
    }

    pub fn error(id: CorrelationId, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: Outcome::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
