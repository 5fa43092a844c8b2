//! # Cancelstream Client
//!
//! The consumer side of the cancellable streaming request contract: issue
//! a request, follow it through `Connecting → Streaming → terminal`, and
//! let an operator cancel it at any point before it settles.
//!
//! The [`consumer`] module drives the lifecycle and publishes every state
//! transition through a watch channel; the [`transfer`] module holds the
//! two cancellable primitives everything is built from — a fetch raced
//! against the request's cancellation signal, and a chunk read raced the
//! same way. Failures are [`FetchError`]s, always tagged with the phase
//! they happened in: `Connect` if no response data had arrived yet,
//! `Streaming` once any had.

pub mod consumer;
pub mod error;
pub mod transfer;

pub use consumer::{Consumer, ConsumerState, RequestHandle};
pub use error::FetchError;
