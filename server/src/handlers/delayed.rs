//! Atomic-delay handlers: `/delayed` and `/delayedCancel`.

use axum::extract::State;
use cancelstream_core::{cancel_pair, CancelSignal};

use crate::error::ServerError;
use crate::producer::{self, CancelBehavior};
use crate::state::AppState;

/// `GET /delayed` — sleep out the configured delay, then answer.
///
/// The silent configuration: no cancellation signal is wired in, so a
/// consumer that aborts is never noticed here. If the connection is gone
/// by the time the handler resolves, the runtime has already dropped this
/// future and the pending timer with it.
pub async fn delayed(State(state): State<AppState>) -> String {
    producer::delayed(
        state.producer.delay(),
        CancelSignal::never(),
        CancelBehavior::Silent,
    )
    .await
}

/// `GET /delayedCancel` — the abort-aware configuration.
///
/// The producer runs as its own task with a token whose write half is
/// armed to trigger when this handler future is dropped. A consumer abort
/// tears the connection down, the runtime drops the handler, the guard
/// fires, and the producer resolves with the alternate body on its own
/// schedule — observable in its logs even though the peer is gone.
///
/// # Errors
///
/// Fails with [`ServerError::TaskFailed`] if the producer task dies
/// before resolving.
pub async fn delayed_cancel(State(state): State<AppState>) -> Result<String, ServerError> {
    tracing::info!("starting delayedCancel");
    let (handle, signal) = cancel_pair();
    let guard = handle.trigger_on_drop();

    let work = tokio::spawn(producer::delayed(
        state.producer.delay(),
        signal,
        CancelBehavior::AbortAware,
    ));

    let body = work
        .await
        .map_err(|err| ServerError::TaskFailed(err.to_string()))?;

    // Completed while the connection was still up; nothing left to cancel.
    drop(guard.disarm());
    Ok(body)
}
