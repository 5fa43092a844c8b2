//! # Cancelstream Server
//!
//! The producer side of the cancellable streaming request contract: a set
//! of HTTP endpoints that answer after a delay, stream their bodies in
//! timed chunks, fail before or after committing data, or relay an opaque
//! token stream — each one a distinct, testable production mode.
//!
//! The production modes themselves live in [`producer`] and are
//! transport-free: they take their durations and a cancellation signal and
//! return bodies or chunk feeds. The [`handlers`] adapt them to HTTP, and
//! [`routes::build_router`] wires the table:
//!
//! | Path | Mode |
//! |---|---|
//! | `/delayed` | atomic delay, silent on cancellation |
//! | `/delayedBody` | two chunks with a gap, never observes cancellation |
//! | `/delayedCancel` | atomic delay, answers with an alternate body on cancellation |
//! | `/throwError` | fails before any body |
//! | `/throwErrorBody` | one chunk, then the stream is torn down |
//! | `/streamAi` | word-by-word token stream, stops on cancellation |
//!
//! Every response carries permissive CORS headers and every route answers
//! OPTIONS preflights, so any browser-hosted consumer can drive the
//! endpoints directly.

pub mod body;
pub mod config;
pub mod error;
pub mod handlers;
pub mod producer;
pub mod routes;
pub mod state;
pub mod tokens;

pub use config::{Config, ProducerConfig, ServerConfig};
pub use error::ServerError;
pub use routes::build_router;
pub use state::AppState;
