//! Consumer-side failure taxonomy.

use cancelstream_core::Phase;
use thiserror::Error;

/// A failed request, classified by the phase it failed in and by whether
/// the operator's own cancel action caused it.
///
/// The phase distinction is part of the contract: a failure with zero
/// body data delivered is a connection failure, a failure after any data
/// arrived is a streaming failure, and the two are never collapsed into
/// one generic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Operator cancelled before any response arrived.
    #[error("Connection cancelled by user")]
    ConnectCancelled,

    /// Operator cancelled while the body was streaming.
    #[error("Streaming cancelled by user")]
    StreamingCancelled,

    /// The request failed before any response data was available.
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    /// The body stream failed after partial data was already delivered.
    #[error("Streaming failed: {0}")]
    StreamingFailed(String),
}

impl FetchError {
    /// The phase this failure occurred in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::ConnectCancelled | Self::ConnectFailed(_) => Phase::Connect,
            Self::StreamingCancelled | Self::StreamingFailed(_) => Phase::Streaming,
        }
    }

    /// Whether the operator's cancel action caused this failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::ConnectCancelled | Self::StreamingCancelled)
    }
}
