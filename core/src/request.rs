//! One logical request attempt and its identity.

use crate::cancel::{cancel_pair, CancelHandle, CancelSignal};
use std::fmt;
use uuid::Uuid;

/// Opaque identity of one request attempt. A retried request gets a new id;
/// ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Descriptor for one request, carrying its cancellation signal from the
/// moment of creation. There is no way to build a descriptor without a
/// token, so every request path downstream can rely on the signal being
/// present.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Per-attempt identity.
    pub id: RequestId,
    /// Target URL.
    pub url: String,
    /// Read half of this request's cancellation token.
    pub signal: CancelSignal,
}

impl RequestDescriptor {
    /// Mint a descriptor and the write half of its token.
    ///
    /// The caller keeps the [`CancelHandle`]; the descriptor travels with
    /// the request.
    #[must_use]
    pub fn new(url: impl Into<String>) -> (Self, CancelHandle) {
        let (handle, signal) = cancel_pair();
        let descriptor = Self {
            id: RequestId::mint(),
            url: url.into(),
            signal,
        };
        (descriptor, handle)
    }
}
