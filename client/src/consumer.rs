//! The request lifecycle state machine.
//!
//! One [`Consumer`] drives at most one request at a time. Starting a new
//! request cancels whatever was in flight, mints a fresh descriptor (new
//! id, new token), and spawns a driver task that walks the request
//! through `Connecting → Streaming → {Completed, Cancelled, Errored}`,
//! publishing every transition through a watch channel.
//!
//! Terminal commitment is first-wins: once any terminal state is
//! published, later transitions are discarded. Combined with the
//! cancel-biased races in [`crate::transfer`], a cancel that lands before
//! the last chunk settles the request as `Cancelled`, while a cancel
//! issued after completion changes nothing.

use cancelstream_core::{CancelHandle, RequestDescriptor, RequestId};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::FetchError;
use crate::transfer;

/// Observable state of a request, published on every transition.
///
/// The failure terminals keep whatever body prefix had accumulated, so a
/// partially streamed result survives its own failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerState {
    /// No request in flight.
    Idle,
    /// Request issued, no response yet.
    Connecting,
    /// Response arrived; body accumulating chunk by chunk.
    Streaming {
        /// Ordered concatenation of the chunks received so far.
        received: String,
    },
    /// Clean end of stream.
    Completed {
        /// The full body.
        body: String,
    },
    /// The operator's cancel action settled the request.
    Cancelled {
        /// Body prefix received before cancellation.
        received: String,
        /// Phase-tagged cancellation error.
        error: FetchError,
    },
    /// A failure not caused by the operator settled the request.
    Errored {
        /// Body prefix received before the failure.
        received: String,
        /// Phase-tagged error.
        error: FetchError,
    },
}

impl ConsumerState {
    /// Whether this state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled { .. } | Self::Errored { .. }
        )
    }
}

/// Live handle onto one request: observe its state, cancel it.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: RequestId,
    cancel: Arc<CancelHandle>,
    state: watch::Receiver<ConsumerState>,
}

impl RequestHandle {
    /// This request's per-attempt id.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ConsumerState {
        self.state.borrow().clone()
    }

    /// A receiver for following state transitions as they happen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConsumerState> {
        self.state.clone()
    }

    /// Trigger this request's cancellation token.
    ///
    /// No-op once the request is terminal; idempotent before that. The
    /// driver observes the trigger at its next suspension point and
    /// settles the request as `Cancelled`.
    pub fn cancel(&self) {
        if self.state.borrow().is_terminal() {
            return;
        }
        self.cancel.cancel();
    }

    /// Wait until the request settles and return its terminal state.
    pub async fn finished(&mut self) -> ConsumerState {
        if let Ok(state) = self.state.wait_for(ConsumerState::is_terminal).await {
            return state.clone();
        }
        // Driver vanished without settling; report the last observed
        // state rather than inventing one.
        self.state.borrow().clone()
    }
}

/// Issues requests and tracks the one currently in flight.
#[derive(Debug, Default)]
pub struct Consumer {
    http: reqwest::Client,
    current: Option<RequestHandle>,
}

impl Consumer {
    /// A consumer with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A consumer reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            current: None,
        }
    }

    /// Current state: the in-flight request's, or `Idle` if none.
    #[must_use]
    pub fn state(&self) -> ConsumerState {
        self.current
            .as_ref()
            .map_or(ConsumerState::Idle, RequestHandle::state)
    }

    /// Issue a request against `url`.
    ///
    /// Cancels any prior in-flight request first — at most one request is
    /// ever active per consumer. Returns immediately with a live handle;
    /// the request runs on its own task.
    pub fn start(&mut self, url: impl Into<String>) -> RequestHandle {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }

        let (descriptor, cancel) = RequestDescriptor::new(url);
        let (updates, state) = watch::channel(ConsumerState::Connecting);

        let handle = RequestHandle {
            id: descriptor.id,
            cancel: Arc::new(cancel),
            state,
        };
        self.current = Some(handle.clone());

        let http = self.http.clone();
        tokio::spawn(drive(http, descriptor, updates));

        handle
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel(&self) {
        if let Some(handle) = &self.current {
            handle.cancel();
        }
    }
}

/// Publish `next` unless a terminal state already committed.
fn commit(updates: &watch::Sender<ConsumerState>, next: ConsumerState) {
    updates.send_if_modified(|state| {
        if state.is_terminal() {
            return false;
        }
        *state = next;
        true
    });
}

fn settle(received: String, error: FetchError) -> ConsumerState {
    if error.is_cancelled() {
        ConsumerState::Cancelled { received, error }
    } else {
        ConsumerState::Errored { received, error }
    }
}

/// Walk one request to its terminal state.
async fn drive(
    http: reqwest::Client,
    descriptor: RequestDescriptor,
    updates: watch::Sender<ConsumerState>,
) {
    let id = descriptor.id;
    let signal = descriptor.signal.clone();

    let response = match transfer::fetch_streaming(&http, &descriptor).await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!(%id, %error, "settled during connect");
            commit(&updates, settle(String::new(), error));
            return;
        }
    };

    commit(
        &updates,
        ConsumerState::Streaming {
            received: String::new(),
        },
    );

    let mut stream = transfer::body_stream(response);
    let mut received = String::new();
    loop {
        match transfer::read_chunk(&mut stream, &signal).await {
            Ok(Some(bytes)) => {
                received.push_str(&String::from_utf8_lossy(&bytes));
                commit(
                    &updates,
                    ConsumerState::Streaming {
                        received: received.clone(),
                    },
                );
            }
            Ok(None) => {
                tracing::debug!(%id, bytes = received.len(), "completed");
                commit(&updates, ConsumerState::Completed { body: received });
                return;
            }
            Err(error) => {
                tracing::debug!(%id, %error, "settled during streaming");
                commit(&updates, settle(received, error));
                return;
            }
        }
    }
}
