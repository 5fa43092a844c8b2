//! Split-ownership cancellation token.
//!
//! A request's cancellation token is shared between exactly two roles:
//!
//! - the **issuer**, who holds the only [`CancelHandle`] and may trigger it
//!   once (further triggers are no-ops), and
//! - any number of **observers**, each holding a cloned [`CancelSignal`]
//!   through which the trigger can be awaited or probed but never caused.
//!
//! The trigger is the only mutation that ever crosses the boundary; no
//! other shared state exists between the two sides. Once triggered the
//! token stays triggered for its whole lifetime, which is the lifetime of
//! the single request it was minted for.

use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};

/// Create a fresh token pair for one request attempt.
///
/// The handle goes to whoever may decide to cancel (the operator, a
/// timeout timer, the transport layer); clones of the signal go to every
/// party that must react.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let token = CancellationToken::new();
    let signal = CancelSignal {
        token: token.clone(),
    };
    (CancelHandle { token }, signal)
}

/// Write half of a cancellation token. Not cloneable: there is exactly one
/// trigger per request.
#[derive(Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Trigger the token. Idempotent: triggering an already-triggered token
    /// changes nothing observable.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("cancellation triggered");
        }
        self.token.cancel();
    }

    /// Whether the token has been triggered.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Convert the handle into a guard that triggers the token when
    /// dropped.
    ///
    /// This is how the HTTP layer turns connection teardown into a token
    /// trigger: the guard lives inside the handler future, so the runtime
    /// dropping that future fires the token for any still-running work.
    #[must_use]
    pub fn trigger_on_drop(self) -> TriggerOnDrop {
        TriggerOnDrop {
            guard: self.token.drop_guard(),
        }
    }
}

/// Guard that triggers its token when dropped. See
/// [`CancelHandle::trigger_on_drop`].
#[derive(Debug)]
pub struct TriggerOnDrop {
    guard: DropGuard,
}

impl TriggerOnDrop {
    /// Release the guard without triggering, recovering the handle.
    #[must_use]
    pub fn disarm(self) -> CancelHandle {
        CancelHandle {
            token: self.guard.disarm(),
        }
    }
}

/// Read half of a cancellation token. Cloneable; every clone is an
/// independent observer registration with its own cleanup.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    /// Resolves when the token is triggered. Resolves immediately if it
    /// already was. Dropping the future deregisters the observer.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Whether the token has been triggered.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A signal that can never fire: for callers that require a signal but
    /// whose issuer deliberately never cancels.
    #[must_use]
    pub fn never() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_wakes_observer() {
        let (handle, signal) = cancel_pair();

        let waiter = tokio::spawn(async move {
            signal.cancelled().await;
        });

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn trigger_is_idempotent() {
        let (handle, signal) = cancel_pair();

        handle.cancel();
        handle.cancel();

        assert!(signal.is_cancelled());
        // A fresh observer still sees exactly one permanent trigger.
        signal.cancelled().await;
    }

    #[tokio::test]
    async fn observe_after_trigger_resolves_immediately() {
        let (handle, signal) = cancel_pair();
        handle.cancel();

        // Must not hang even though the trigger happened before we awaited.
        tokio::time::timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn all_clones_observe_the_trigger() {
        let (handle, signal) = cancel_pair();
        let observers: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.cancelled().await })
            })
            .collect();

        handle.cancel();
        for observer in observers {
            tokio::time::timeout(Duration::from_secs(1), observer)
                .await
                .unwrap()
                .unwrap();
        }
    }

    #[tokio::test]
    async fn drop_guard_triggers() {
        let (handle, signal) = cancel_pair();
        let guard = handle.trigger_on_drop();

        assert!(!signal.is_cancelled());
        drop(guard);
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn disarmed_guard_does_not_trigger() {
        let (handle, signal) = cancel_pair();
        let guard = handle.trigger_on_drop();
        let handle = guard.disarm();

        assert!(!signal.is_cancelled());
        handle.cancel();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn untriggered_signal_does_not_fire() {
        let (_handle, signal) = cancel_pair();
        let result =
            tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(result.is_err());
    }
}
