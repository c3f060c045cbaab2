//! Debounce for expensive follow-up work.
//!
//! The sidebar runs on a tick-driven event loop, so the "timer" is just a
//! deadline that the loop checks. Queueing replaces whatever was pending and
//! pushes the deadline out again; only the newest action ever fires.

use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug)]
struct Pending<A> {
    action: A,
    deadline: Instant,
}

/// Collapses bursts of requests into one action after a quiet period
#[derive(Debug)]
pub struct ThrottledScheduler<A> {
    delay: Duration,
    pending: Option<Pending<A>>,
}

impl<A> ThrottledScheduler<A> {
    /// Create a scheduler that waits `delay` after the last `queue` call
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period before a queued action fires
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending action and restart the delay from `now`
    pub fn queue_at(&mut self, action: A, now: Instant) {
        if self.pending.is_some() {
            trace!("Replacing pending throttled action");
        }
        self.pending = Some(Pending {
            action,
            deadline: now + self.delay,
        });
    }

    /// [`queue_at`](Self::queue_at) using the current time
    pub fn queue(&mut self, action: A) {
        self.queue_at(action, Instant::now());
    }

    /// Take the pending action if its deadline has passed.
    ///
    /// Returns `Some` at most once per queued action.
    pub fn take_due(&mut self, now: Instant) -> Option<A> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.action)
    }

    /// When the pending action will become due
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Whether an action is waiting to fire
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending action without running it
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!("Cancelled pending throttled action");
        }
    }

    /// Tear down the scheduler; a pending action never runs
    pub fn dispose(mut self) {
        self.cancel();
    }
}
