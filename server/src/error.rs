//! Producer and handler error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A fault raised inside a production mode.
///
/// When raised before any body is committed, the handler boundary converts
/// it into a well-formed error response carrying this description. When
/// raised after a chunk is already out, it travels through the body stream
/// and tears the transport down instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProducerError {
    /// Unhandled error inside the producer.
    #[error("{0}")]
    Fault(String),
}

impl ProducerError {
    /// The fault the failing modes raise.
    #[must_use]
    pub fn fault() -> Self {
        Self::Fault("This is a test error".to_string())
    }
}

/// Error a handler resolves with before committing a response.
///
/// Rendered as a plain-text error response; never allowed to propagate
/// into the router's request loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The producer raised before committing any body.
    #[error(transparent)]
    Producer(#[from] ProducerError),
    /// The spawned producer task died before resolving.
    #[error("producer task failed: {0}")]
    TaskFailed(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed before commit");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
