//! # Cancelstream Core
//!
//! Request-scoped primitives shared by the producer and consumer sides of a
//! cancellable streaming request:
//!
//! - **Cancellation token**: a single-trigger, write-once-read-many signal
//!   split into a write half ([`CancelHandle`]) owned by the request issuer
//!   and a cloneable read half ([`CancelSignal`]) handed to everything
//!   downstream.
//! - **Request descriptor**: one logical request attempt, minted together
//!   with its token so every request path carries a signal by construction.
//! - **Pending timer**: a delayed action that races its owner's cancellation
//!   signal with first-settler-wins semantics.
//! - **Phase**: classifies a failure as happening before or after initial
//!   response data arrived.
//!
//! Everything here is transient: created when a request starts, destroyed
//! when the request reaches its single terminal outcome. Nothing outlives
//! the handling of one request.

pub mod cancel;
pub mod phase;
pub mod request;
pub mod timer;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal, TriggerOnDrop};
pub use phase::Phase;
pub use request::{RequestDescriptor, RequestId};
pub use timer::{PendingTimer, TimerOutcome};
