//! Elapsed-time checks against free-running `u32` counters.
//!
//! The hardware counters wrap (milliseconds after ~49 days, microseconds
//! after ~71 minutes).  A counter that reads *earlier* than the recorded
//! timestamp can only mean it wrapped, so that case counts as elapsed and
//! the gated work runs immediately instead of stalling for a full period.

/// `true` once strictly more than `interval` has passed since `since`,
/// or if `now` reads earlier than `since`.
pub const fn interval_elapsed(now: u32, since: u32, interval: u32) -> bool {
    now < since || now - since > interval
}

/// A periodic gate: fires at most once per interval and re-arms itself.
#[derive(Debug, Clone, Copy)]
pub struct IntervalGate {
    interval: u32,
    last: u32,
}

impl IntervalGate {
    /// Create a gate armed at `now`; the first fire is one interval later.
    pub const fn new(interval: u32, now: u32) -> Self {
        Self { interval, last: now }
    }

    /// Returns `true` (and re-arms at `now`) if the interval has elapsed.
    pub fn poll(&mut self, now: u32) -> bool {
        if interval_elapsed(now, self.last, self.interval) {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn last_fired(&self) -> u32 {
        self.last
    }
}
