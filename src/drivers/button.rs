//! Polled push-button debouncer.
//!
//! ## Hardware
//!
//! The encoder's push switch is active-low with a pull-up.  The main loop
//! samples the raw level every cycle and feeds it here together with the
//! millisecond counter.
//!
//! ## Algorithm
//!
//! Any change in the raw level restarts the settle timer.  Once the raw
//! level has held for longer than the settle time and differs from the
//! committed level, it is committed and reported as a change.  A glitch
//! that reverts inside the settle window is never committed.

use embedded_hal::digital::PinState;

use crate::control::timing::interval_elapsed;

/// Default settle time.
pub const DEBOUNCE_MS: u32 = 50;

/// Result of one [`InputDebouncer::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounced {
    /// Committed (stable) level after this sample.
    pub level: PinState,
    /// `true` only on the call that committed a new level.
    pub changed: bool,
}

impl Debounced {
    /// A committed high→low transition, i.e. a press on an active-low switch.
    pub fn is_falling_edge(&self) -> bool {
        self.changed && self.level == PinState::Low
    }
}

#[derive(Debug, Clone)]
pub struct InputDebouncer {
    settle_ms: u32,
    last_raw: PinState,
    last_change_ms: u32,
    stable: PinState,
}

impl InputDebouncer {
    /// Start with `initial` as both the raw and committed level.
    pub fn new(initial: PinState) -> Self {
        Self::with_settle(initial, DEBOUNCE_MS)
    }

    pub fn with_settle(initial: PinState, settle_ms: u32) -> Self {
        Self {
            settle_ms,
            last_raw: initial,
            last_change_ms: 0,
            stable: initial,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    pub fn update(&mut self, raw: PinState, now_ms: u32) -> Debounced {
        if raw != self.last_raw {
            self.last_change_ms = now_ms;
            self.last_raw = raw;
        }

        let mut changed = false;
        if interval_elapsed(now_ms, self.last_change_ms, self.settle_ms) && raw != self.stable {
            self.stable = raw;
            changed = true;
        }

        Debounced {
            level: self.stable,
            changed,
        }
    }

    /// Committed level.
    pub fn level(&self) -> PinState {
        self.stable
    }
}
