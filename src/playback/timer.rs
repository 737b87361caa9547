use std::time::Duration;

/// Opaque identifier for one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// Host event loop seen from the scheduler.
///
/// The host calls back into [`Scheduler::fire`](crate::Scheduler::fire) with the handle once a
/// timer expires. A cancelled handle must never be reported.
pub trait TimerHost {
    /// Arm a one-shot timer that expires after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    /// Disarm exactly `handle`. Unknown or already-expired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Deterministic virtual clock.
///
/// Nothing expires on its own: the owner pulls due timers with [`ManualTimers::pop_due`] or
/// [`ManualTimers::advance_to_next`] and reports them to the scheduler.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    // (deadline, handle), unsorted; timers are few.
    armed: Vec<(Duration, TimerHandle)>,
    cancelled: usize,
}

impl ManualTimers {
    /// Clock starting at zero with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.armed.len()
    }

    /// Number of successful cancellations so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.armed.iter().map(|(at, _)| *at).min()
    }

    /// Remove and return the earliest timer due at or before `limit`, moving the clock to its
    /// deadline. Ties expire in scheduling order.
    pub fn pop_due(&mut self, limit: Duration) -> Option<TimerHandle> {
        let (pos, &(at, handle)) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= limit)
            .min_by_key(|(_, (at, handle))| (*at, *handle))?;
        self.armed.swap_remove(pos);
        self.now = self.now.max(at);
        Some(handle)
    }

    /// Jump straight to the earliest deadline and expire that timer.
    pub fn advance_to_next(&mut self) -> Option<TimerHandle> {
        let next = self.next_deadline()?;
        self.pop_due(next)
    }

    /// Move the clock forward by `by`, returning every timer that came due in deadline order.
    ///
    /// Timers armed by the caller while handling the returned handles are not included; use
    /// [`Scheduler::run_for`](crate::Scheduler::run_for) to drive a scheduler through a window.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        let target = self.now + by;
        let due = std::iter::from_fn(|| self.pop_due(target)).collect();
        self.settle(target);
        due
    }

    /// Move the clock forward to `at` without expiring anything.
    pub fn settle(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }
}

impl TimerHost for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed.push((self.now + delay, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let before = self.armed.len();
        self.armed.retain(|(_, h)| *h != handle);
        if self.armed.len() != before {
            self.cancelled += 1;
        }
    }
}
