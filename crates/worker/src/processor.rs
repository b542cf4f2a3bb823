//! # List Processor
//!
//! Runs list operations on one dedicated background thread so the caller's
//! context never blocks on a large batch.
//!
//! Requests go in over an unbounded channel and are handled one at a time,
//! in submission order, each to completion. Every response is posted on the
//! response channel the caller supplied at spawn time; the caller matches
//! responses to requests by id.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ProcessorConfig;
use crate::dispatch::handle_request;
use crate::error::ProcessorError;
use crate::protocol::{RequestEnvelope, ResponseEnvelope};

/// Handle to a running processor thread.
pub struct ListProcessor {
    requests: Option<mpsc::UnboundedSender<RequestEnvelope>>,
    worker: Option<JoinHandle<()>>,
}

impl ListProcessor {
    /// Start the background thread.
    ///
    /// # Arguments
    /// * `config` - Thread name and related settings
    /// * `responses` - Where every response is posted
    pub fn spawn(
        config: &ProcessorConfig,
        responses: mpsc::UnboundedSender<ResponseEnvelope>,
    ) -> Result<Self, ProcessorError> {
        let (requests, inbox) = mpsc::unbounded_channel();

        let worker = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run(inbox, responses))
            .map_err(ProcessorError::Spawn)?;

        info!("Started list processor thread '{}'", config.thread_name);
        Ok(Self {
            requests: Some(requests),
            worker: Some(worker),
        })
    }

    /// Queue a request. Never blocks.
    pub fn post(&self, request: RequestEnvelope) -> Result<(), ProcessorError> {
        let requests = self.requests.as_ref().ok_or(ProcessorError::Closed)?;
        requests.send(request).map_err(|_| ProcessorError::Closed)
    }

    /// Stop accepting requests, let queued ones finish, and join the thread.
    pub fn shutdown(mut self) -> Result<(), ProcessorError> {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| ProcessorError::Closed)?;
        }
        info!("List processor stopped");
        Ok(())
    }
}

impl Drop for ListProcessor {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop; the thread is not joined here.
        self.requests.take();
    }
}

fn run(
    mut inbox: mpsc::UnboundedReceiver<RequestEnvelope>,
    responses: mpsc::UnboundedSender<ResponseEnvelope>,
) {
    while let Some(request) = inbox.blocking_recv() {
        let id = request.id.clone();
        let response = handle_request(request);
        debug!(%id, error = response.is_error(), "Posting response");

        if responses.send(response).is_err() {
            warn!(%id, "Response receiver dropped, stopping list processor");
            break;
        }
    }
    debug!("List processor loop finished");
}
