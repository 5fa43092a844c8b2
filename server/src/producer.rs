//! Transport-free production modes.
//!
//! Each mode here is one invocation of the producer state machine:
//! `Received → Working → {Completed, Aborted, Failed}`. From `Working`
//! there is a race between the unit of work finishing and the cancellation
//! signal firing; whichever settles first decides the transition and the
//! loser is dropped on the spot, so no invocation ever resolves twice.
//!
//! Chunked modes hand back a [`ChunkFeed`]: the emitter is a spawned task
//! pushing into an unbounded channel, so emission is push-driven and keeps
//! going even when the reading side walks away — mirroring a response body
//! that is produced eagerly rather than pulled.

use bytes::Bytes;
use cancelstream_core::{CancelSignal, PendingTimer, TimerOutcome};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::ProducerError;

/// Body of a delayed response that ran to completion.
pub const COMPLETED_BODY: &str = "Request completed after 3 seconds";
/// Alternate body an abort-aware producer answers with when it observes
/// cancellation.
pub const CANCELLED_BODY: &str = "Request was cancelled by the client";
/// First chunk of the chunked modes.
pub const FIRST_CHUNK: &str = "Hello,";
/// Second chunk of the well-behaved chunked mode.
pub const SECOND_CHUNK: &str = " world!";

/// What an atomic-delay producer does when its cancellation signal fires
/// before the delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelBehavior {
    /// Release the timer and never resolve. The client observed its own
    /// cancellation locally; this side never answers anyone.
    Silent,
    /// Release the timer and resolve immediately with [`CANCELLED_BODY`].
    AbortAware,
}

/// Atomic-delay mode: wait out `delay`, then answer with a single complete
/// body. If `signal` fires first the pending timer is released and the
/// outcome follows `behavior`.
pub async fn delayed(delay: Duration, signal: CancelSignal, behavior: CancelBehavior) -> String {
    match PendingTimer::new(delay).run(&signal).await {
        TimerOutcome::Elapsed => {
            tracing::info!("request completed after delay");
            COMPLETED_BODY.to_string()
        }
        TimerOutcome::Cancelled => match behavior {
            CancelBehavior::AbortAware => {
                tracing::info!("request was cancelled by the client");
                CANCELLED_BODY.to_string()
            }
            CancelBehavior::Silent => std::future::pending().await,
        },
    }
}

/// Immediate-failure mode: the fault is raised before any body exists, so
/// the boundary can still convert it into a well-formed error response.
///
/// # Errors
///
/// Always fails with [`ProducerError::Fault`].
pub async fn failing() -> Result<String, ProducerError> {
    Err(ProducerError::fault())
}

/// A chunked body under production: the receiving half of the emitter's
/// channel plus the emitter task itself, so callers can both consume the
/// chunks and observe that emission ran to completion.
#[derive(Debug)]
pub struct ChunkFeed {
    /// Ordered chunks; an `Err` item tears the transport stream down.
    pub chunks: mpsc::UnboundedReceiver<Result<Bytes, ProducerError>>,
    /// The emitter task. Emission finishes on its own schedule whether or
    /// not anyone is still reading.
    pub emitter: JoinHandle<()>,
}

impl ChunkFeed {
    /// Detach the emitter and turn the feed into a body stream.
    #[must_use]
    pub fn into_stream(self) -> UnboundedReceiverStream<Result<Bytes, ProducerError>> {
        UnboundedReceiverStream::new(self.chunks)
    }
}

/// Chunked mode: [`FIRST_CHUNK`] at once, `gap` later [`SECOND_CHUNK`],
/// then a clean close. The emitter never looks at a cancellation signal;
/// stopping early is the reader's business.
#[must_use]
pub fn chunked_body(gap: Duration) -> ChunkFeed {
    let (tx, chunks) = mpsc::unbounded_channel();
    let emitter = tokio::spawn(async move {
        let _ = tx.send(Ok(Bytes::from_static(FIRST_CHUNK.as_bytes())));
        sleep(gap).await;
        let _ = tx.send(Ok(Bytes::from_static(SECOND_CHUNK.as_bytes())));
        tracing::debug!("chunked body emitted fully");
    });
    ChunkFeed { chunks, emitter }
}

/// Mid-stream-failure mode: [`FIRST_CHUNK`], a short `gap`, then a fault
/// instead of a close. The first chunk is already committed by then, so
/// the fault surfaces as a torn stream rather than an error response.
#[must_use]
pub fn failing_body(gap: Duration) -> ChunkFeed {
    let (tx, chunks) = mpsc::unbounded_channel();
    let emitter = tokio::spawn(async move {
        let _ = tx.send(Ok(Bytes::from_static(FIRST_CHUNK.as_bytes())));
        sleep(gap).await;
        let _ = tx.send(Err(ProducerError::fault()));
    });
    ChunkFeed { chunks, emitter }
}

/// Token-stream mode: forward `tokens` chunk by chunk until the stream
/// runs dry or `signal` fires, whichever comes first.
#[must_use]
pub fn token_stream(mut tokens: BoxStream<'static, String>, signal: CancelSignal) -> ChunkFeed {
    let (tx, chunks) = mpsc::unbounded_channel();
    let emitter = tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                biased;
                () = signal.cancelled() => {
                    tracing::info!("token stream cancelled");
                    break;
                }
                token = tokens.next() => token,
            };
            let Some(token) = next else { break };
            if tx.send(Ok(Bytes::from(token.into_bytes()))).is_err() {
                break;
            }
        }
    });
    ChunkFeed { chunks, emitter }
}
