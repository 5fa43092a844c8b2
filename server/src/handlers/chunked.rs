//! Chunked-body handler: `/delayedBody`.

use axum::body::Body;
use axum::extract::State;

use crate::producer;
use crate::state::AppState;

/// `GET /delayedBody` — first chunk immediately, the second after the
/// configured gap, then a clean close.
///
/// Emission is push-driven and ignores the consumer entirely: a reader
/// that aborts mid-stream stops its own loop, the emitter still finishes.
pub async fn delayed_body(State(state): State<AppState>) -> Body {
    let feed = producer::chunked_body(state.producer.chunk_gap());
    Body::from_stream(feed.into_stream())
}
