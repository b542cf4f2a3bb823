//! Caller-side client for the list processor.
//!
//! The client owns a [`ListProcessor`], hands out correlation ids, and runs a
//! small pump task that routes each response to the call waiting for it.
//! Calls may overlap freely; responses are matched by id, not arrival order.
//!
//! A call can end early in two ways:
//! - the configured request timeout expires, giving [`ProcessorError::Timeout`]
//! - the caller drops the call future
//!
//! Either way the pending entry is removed and the late response is dropped
//! by the pump. The processor still finishes the computation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pipeline::FilterCriteria;
use records::ListRecord;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ProcessorConfig;
use crate::dispatch::{FilterPostsPayload, OperationKind, SearchAndFilterPayload, SearchPostsPayload};
use crate::error::ProcessorError;
use crate::processor::ListProcessor;
use crate::protocol::{CorrelationId, Outcome, RequestEnvelope, ResponseEnvelope};

type PendingTable = Arc<Mutex<HashMap<CorrelationId, oneshot::Sender<Outcome>>>>;

fn lock(pending: &PendingTable) -> MutexGuard<'_, HashMap<CorrelationId, oneshot::Sender<Outcome>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a call's pending entry when the call finishes, times out, or is dropped.
struct PendingGuard {
    pending: PendingTable,
    id: CorrelationId,
}

impl PendingGuard {
    fn register(pending: &PendingTable, id: CorrelationId, waiter: oneshot::Sender<Outcome>) -> Self {
        lock(pending).insert(id.clone(), waiter);
        Self {
            pending: pending.clone(),
            id,
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if lock(&self.pending).remove(&self.id).is_some() {
            debug!(id = %self.id, "Abandoned pending request");
        }
    }
}

pub struct ProcessorClient {
    processor: ListProcessor,
    pending: PendingTable,
    next_id: AtomicU64,
    request_timeout: Option<Duration>,
    pump: JoinHandle<()>,
}

impl ProcessorClient {
    /// Spawn a processor and the response pump.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: ProcessorConfig) -> Result<Self, ProcessorError> {
        let (responses, outbox) = mpsc::unbounded_channel();
        let processor = ListProcessor::spawn(&config, responses)?;
        let pending: PendingTable = Arc::new(Mutex::new(HashMap::new()));
        let pump = tokio::spawn(pump_responses(outbox, pending.clone()));

        Ok(Self {
            processor,
            pending,
            next_id: AtomicU64::new(1),
            request_timeout: config.request_timeout,
            pump,
        })
    }

    /// Number of calls still waiting for a response.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Send one operation and wait for its result.
    pub async fn call(&self, kind: OperationKind, payload: Value) -> Result<Value, ProcessorError> {
        self.call_named(kind.as_wire(), payload).await
    }

    /// Like [`ProcessorClient::call`], with the operation given by its wire name.
    ///
    /// Names the processor does not know come back as
    /// [`ProcessorError::UnknownOperation`].
    pub async fn call_named(&self, operation: &str, payload: Value) -> Result<Value, ProcessorError> {
        let id = CorrelationId::from(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (waiter, response) = oneshot::channel();
        let _guard = PendingGuard::register(&self.pending, id.clone(), waiter);

        debug!(%id, operation, "Posting request");
        self.processor
            .post(RequestEnvelope::new(id, operation, payload))?;

        let outcome = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, response)
                .await
                .map_err(|_| ProcessorError::Timeout(limit))?,
            None => response.await,
        };

        match outcome {
            Ok(Outcome::Data(data)) => Ok(data),
            Ok(Outcome::Error(message)) => Err(ProcessorError::from_wire(message)),
            Err(_) => Err(ProcessorError::Closed),
        }
    }

    pub async fn search_and_filter(
        &self,
        records: Vec<ListRecord>,
        criteria: FilterCriteria,
    ) -> Result<Vec<ListRecord>, ProcessorError> {
        let payload = serde_json::to_value(SearchAndFilterPayload {
            data: records,
            filters: criteria,
        })?;
        let result = self.call(OperationKind::SearchAndFilter, payload).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn search_posts(
        &self,
        posts: Vec<ListRecord>,
        search_term: Option<&str>,
    ) -> Result<Vec<ListRecord>, ProcessorError> {
        let payload = serde_json::to_value(SearchPostsPayload {
            posts,
            search_term: search_term.map(str::to_string),
        })?;
        let result = self.call(OperationKind::SearchPosts, payload).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn filter_posts(
        &self,
        posts: Vec<ListRecord>,
        filters: Value,
    ) -> Result<Vec<ListRecord>, ProcessorError> {
        let payload = serde_json::to_value(FilterPostsPayload { posts, filters })?;
        let result = self.call(OperationKind::FilterPosts, payload).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Stop the processor after queued requests finish, then stop the pump.
    pub async fn shutdown(self) -> Result<(), ProcessorError> {
        let ProcessorClient {
            processor, pump, ..
        } = self;

        tokio::task::spawn_blocking(move || processor.shutdown())
            .await
            .map_err(|_| ProcessorError::Closed)??;
        pump.await.map_err(|_| ProcessorError::Closed)?;
        Ok(())
    }
}

/// Route responses to their waiting calls until the processor goes away.
async fn pump_responses(mut outbox: mpsc::UnboundedReceiver<ResponseEnvelope>, pending: PendingTable) {
    while let Some(ResponseEnvelope { id, outcome }) = outbox.recv().await {
        let waiter = lock(&pending).remove(&id);
        match waiter {
            Some(waiter) => {
                if waiter.send(outcome).is_err() {
                    debug!(%id, "Caller stopped waiting before the response arrived");
                }
            }
            None => debug!(%id, "Discarding response with no pending request"),
        }
    }

    // Processor gone: wake every remaining caller with a closed channel.
    let abandoned = {
        let mut table = lock(&pending);
        let count = table.len();
        table.clear();
        count
    };
    info!(abandoned, "Response pump finished");
}
