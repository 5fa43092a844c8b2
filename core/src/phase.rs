//! Failure phase classification.

use std::fmt;

/// The phase of a request in which a failure occurred.
///
/// A failure with zero response data delivered is a `Connect` failure; a
/// failure after any body data arrived is a `Streaming` failure. The
/// distinction is preserved all the way to the operator-visible error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before any response data was available.
    Connect,
    /// After partial response data was already delivered.
    Streaming,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}
