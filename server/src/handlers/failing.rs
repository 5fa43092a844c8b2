//! Failure-mode handlers: `/throwError` and `/throwErrorBody`.

use axum::body::Body;
use axum::extract::State;

use crate::error::ServerError;
use crate::producer;
use crate::state::AppState;

/// `GET /throwError` — the producer faults before any body exists, so the
/// boundary converts the fault into a well-formed error response carrying
/// its description.
///
/// # Errors
///
/// Always fails with the producer's fault.
pub async fn throw_error() -> Result<String, ServerError> {
    let body = producer::failing().await?;
    Ok(body)
}

/// `GET /throwErrorBody` — one chunk goes out, then the producer faults.
/// Headers and the first chunk are already committed, so the fault
/// surfaces as a torn body stream, not as an error response.
pub async fn throw_error_body(State(state): State<AppState>) -> Body {
    let feed = producer::failing_body(state.producer.failure_gap());
    Body::from_stream(feed.into_stream())
}
