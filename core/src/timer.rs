//! Delayed actions that race cancellation.

use crate::cancel::CancelSignal;
use std::time::Duration;
use tokio::time::sleep;

/// How a [`PendingTimer`] settled. Exactly one of the two ever happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The full duration elapsed before the signal fired.
    Elapsed,
    /// The signal fired first; the timer was released without firing.
    Cancelled,
}

/// A single delayed action owned by one producer invocation.
///
/// Running the timer races the sleep against the owning request's
/// cancellation signal. Whichever settles first wins and the loser is
/// dropped on the spot, so a cancelled timer holds no resources past the
/// trigger and a fired timer stops observing the signal. If both are due
/// at the same instant, cancellation wins.
#[derive(Debug)]
pub struct PendingTimer {
    duration: Duration,
}

impl PendingTimer {
    /// A timer that fires after `duration` unless cancelled first.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Wait out the timer against `signal`.
    pub async fn run(self, signal: &CancelSignal) -> TimerOutcome {
        tokio::select! {
            biased;
            () = signal.cancelled() => TimerOutcome::Cancelled,
            () = sleep(self.duration) => TimerOutcome::Elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancel_pair;

    #[tokio::test(start_paused = true)]
    async fn elapses_when_never_cancelled() {
        let (_handle, signal) = cancel_pair();
        let timer = PendingTimer::new(Duration::from_millis(3000));
        assert_eq!(timer.run(&signal).await, TimerOutcome::Elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_beats_a_longer_timer() {
        let (handle, signal) = cancel_pair();
        let timer = PendingTimer::new(Duration::from_millis(3000));

        let race = tokio::spawn(async move { timer.run(&signal).await });
        tokio::time::sleep(Duration::from_millis(1000)).await;
        handle.cancel();

        assert_eq!(race.await.unwrap(), TimerOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn already_triggered_signal_cancels_immediately() {
        let (handle, signal) = cancel_pair();
        handle.cancel();

        let timer = PendingTimer::new(Duration::from_millis(3000));
        let started = tokio::time::Instant::now();
        assert_eq!(timer.run(&signal).await, TimerOutcome::Cancelled);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn tie_goes_to_cancellation() {
        // Trigger scheduled for the exact instant the timer is due.
        let (handle, signal) = cancel_pair();
        let duration = Duration::from_millis(1000);

        let ((), outcome) = tokio::join!(
            async {
                tokio::time::sleep(duration).await;
                handle.cancel();
            },
            PendingTimer::new(duration).run(&signal),
        );

        assert_eq!(outcome, TimerOutcome::Cancelled);
    }
}
