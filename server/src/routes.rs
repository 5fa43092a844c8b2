//! Router configuration.

use crate::handlers;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router for the full endpoint table.
///
/// The CORS layer puts `Access-Control-Allow-Origin: *` (with the GET and
/// OPTIONS methods and the content-type header) on every response and
/// answers OPTIONS preflights for every route, so no per-route OPTIONS
/// handlers exist.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/delayed", get(handlers::delayed))
        .route("/delayedBody", get(handlers::delayed_body))
        .route("/delayedCancel", get(handlers::delayed_cancel))
        .route("/throwError", get(handlers::throw_error))
        .route("/throwErrorBody", get(handlers::throw_error_body))
        .route("/streamAi", get(handlers::stream_ai))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
