//! # Cancelstream Relay
//!
//! A relay is a producer that is itself a consumer: while answering its
//! own caller it fetches from an upstream producer, and when its caller's
//! timer cancels the request, the cancellation has to reach the in-flight
//! upstream call instead of orphaning it.
//!
//! Two compositions, differing in where the cancellation lands:
//!
//! - [`fetch_then_abort`]: the token triggers before the upstream
//!   response has settled. The outbound call observes the trigger, fails
//!   with a cancellation-flavored error, and the relay converts that into
//!   a textual result — the raw transport error never reaches the relay's
//!   caller.
//! - [`abort_during_body`]: the upstream response (headers) has already
//!   arrived and the body is streaming when the token triggers. The read
//!   itself observes the trigger and fails, and the chunks read before
//!   that moment are kept and reported.
//!
//! In the canonical configuration the relay's timer (1 s) sits below the
//! upstream's work duration (3 s), so the cancellation deterministically
//! wins; when the two would land on the same instant, cancellation wins
//! the tie by construction of the underlying races.

use cancelstream_client::transfer;
use cancelstream_core::RequestDescriptor;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

/// Terminal result of a relay invocation. Always a value, never an error:
/// the relay answers its caller no matter what happened upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The upstream answered in full before the cancel timer mattered.
    Completed(String),
    /// Cancelled before any upstream response arrived.
    CancelledBeforeResponse(String),
    /// Cancelled while the upstream body was streaming; the prefix read
    /// before the trigger is retained.
    CancelledMidStream {
        /// Chunks read before cancellation took effect, in order.
        partial: String,
        /// Description of the cancellation error the read observed.
        reason: String,
    },
    /// The upstream failed for a reason other than our cancellation.
    Failed(String),
}

impl RelayOutcome {
    /// Whether this outcome was caused by the relay's own cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::CancelledBeforeResponse(_) | Self::CancelledMidStream { .. }
        )
    }
}

impl fmt::Display for RelayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(text) => write!(f, "Done! {text}"),
            Self::CancelledBeforeResponse(reason) => write!(f, "Error: {reason}"),
            Self::CancelledMidStream { partial, reason } => {
                write!(f, "Error: {reason}; partial body: {partial}")
            }
            Self::Failed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// Pre-send cancellation: fetch `{base_url}/delayed` and trigger our own
/// token at `cancel_after`, before the response promise has settled.
pub async fn fetch_then_abort(
    http: &reqwest::Client,
    base_url: &str,
    cancel_after: Duration,
) -> RelayOutcome {
    let (descriptor, handle) = RequestDescriptor::new(format!("{base_url}/delayed"));
    tracing::info!(id = %descriptor.id, "relay fetch with scheduled abort");

    // The fetch and the cancel timer run together; the timer triggering
    // makes the fetch settle with a cancellation error shortly after.
    let ((), result) = tokio::join!(
        async {
            sleep(cancel_after).await;
            handle.cancel();
        },
        transfer::fetch_streaming(http, &descriptor),
    );

    match result {
        Ok(response) => match response.text().await {
            Ok(text) => RelayOutcome::Completed(text),
            Err(err) => RelayOutcome::Failed(err.to_string()),
        },
        Err(error) if error.is_cancelled() => {
            RelayOutcome::CancelledBeforeResponse(error.to_string())
        }
        Err(error) => RelayOutcome::Failed(error.to_string()),
    }
}

/// Mid-stream cancellation: await the response for
/// `{base_url}/delayedBody` first, then arm the cancel timer while
/// reading the streamed body. Chunks read before the trigger survive into
/// the outcome.
pub async fn abort_during_body(
    http: &reqwest::Client,
    base_url: &str,
    cancel_after: Duration,
) -> RelayOutcome {
    let (descriptor, handle) = RequestDescriptor::new(format!("{base_url}/delayedBody"));
    tracing::info!(id = %descriptor.id, "relay streamed fetch with scheduled abort");

    let response = match transfer::fetch_streaming(http, &descriptor).await {
        Ok(response) => response,
        Err(error) => return RelayOutcome::Failed(error.to_string()),
    };

    let signal = descriptor.signal.clone();
    let read_all = async {
        let mut stream = transfer::body_stream(response);
        let mut text = String::new();
        loop {
            match transfer::read_chunk(&mut stream, &signal).await {
                Ok(Some(bytes)) => text.push_str(&String::from_utf8_lossy(&bytes)),
                Ok(None) => return Ok(text),
                Err(error) => return Err((text, error)),
            }
        }
    };

    let ((), result) = tokio::join!(
        async {
            sleep(cancel_after).await;
            handle.cancel();
        },
        read_all,
    );

    match result {
        Ok(text) => RelayOutcome::Completed(text),
        Err((partial, error)) if error.is_cancelled() => RelayOutcome::CancelledMidStream {
            partial,
            reason: error.to_string(),
        },
        Err((_, error)) => RelayOutcome::Failed(error.to_string()),
    }
}
