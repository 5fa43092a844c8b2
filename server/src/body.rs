//! Bridging transport teardown into cancellation tokens.

use cancelstream_core::TriggerOnDrop;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A body stream that triggers a cancellation token when the transport
/// drops it.
///
/// Hyper drops the response body when the peer goes away; wrapping the
/// body in this adapter turns that drop into a token trigger, so the
/// emitter behind the stream observes the consumer's abort through the
/// same signal as every other cancellation source. The guard also fires
/// after a normal end-of-stream, which is a no-op for a request that has
/// already reached its terminal outcome.
#[derive(Debug)]
pub struct GuardedStream<S> {
    inner: S,
    _guard: TriggerOnDrop,
}

impl<S> GuardedStream<S> {
    /// Wrap `inner`, arming `guard` for the drop.
    pub const fn new(inner: S, guard: TriggerOnDrop) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S: Stream + Unpin> Stream for GuardedStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
