//! Rotary encoder decoder (single-edge quadrature).
//!
//! Triggers on every transition of the clock phase; the data phase at that
//! moment gives the direction.  One event per detected clock edge, no
//! 4x state machine.
//!
//! ```text
//!  CLK ──┐   ┌───┐   ┌──     data != clk on edge → Clockwise
//!        └───┘   └───┘       data == clk on edge → CounterClockwise
//! ```

use embedded_hal::digital::PinState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone)]
pub struct EncoderDecoder {
    last_clock: PinState,
}

impl EncoderDecoder {
    /// Seed with the clock level observed at startup.
    pub fn new(initial_clock: PinState) -> Self {
        Self {
            last_clock: initial_clock,
        }
    }

    pub fn update(&mut self, clock: PinState, data: PinState) -> Option<Direction> {
        if clock == self.last_clock {
            return None;
        }
        self.last_clock = clock;

        if data == clock {
            Some(Direction::CounterClockwise)
        } else {
            Some(Direction::Clockwise)
        }
    }
}
