//! Token-stream handler: `/streamAi`.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use cancelstream_core::cancel_pair;

use crate::body::GuardedStream;
use crate::producer;
use crate::state::AppState;
use crate::tokens::LECTURE_PROMPT;

/// `GET /streamAi` — stream the token source's answer word by word.
///
/// Abort-aware: the body stream carries a drop guard for the request's
/// token, so when the consumer goes away the emitter sees the signal at
/// its next suspension point and stops generating instead of running the
/// whole lecture into a closed connection.
pub async fn stream_ai(State(state): State<AppState>) -> Response {
    let (handle, signal) = cancel_pair();
    let feed = producer::token_stream(state.tokens.generate(LECTURE_PROMPT), signal);
    let body = Body::from_stream(GuardedStream::new(feed.into_stream(), handle.trigger_on_drop()));

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
