//! Processor configuration.

use std::time::Duration;

const DEFAULT_THREAD_NAME: &str = "list-processor";

/// Settings for a [`crate::ListProcessor`] and the client that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Name of the dedicated background thread.
    pub thread_name: String,
    /// How long a client call waits for its response. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl ProcessorConfig {
    pub fn with_thread_name(self, thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            ..self
        }
    }

    pub fn with_request_timeout(self, timeout: Duration) -> Self {
        Self {
            request_timeout: Some(timeout),
            ..self
        }
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            request_timeout: None,
        }
    }
}
