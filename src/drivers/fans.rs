//! Fan output bank (four logic-level MOSFET gates, active HIGH).
//!
//! Plain on/off control; the decision logic lives in
//! [`control::fan`](crate::control::fan).  This driver is a dumb actuator;
//! the controller tracks which fans are running.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: hw_init records the levels in memory.

use crate::drivers::hw_init;
use crate::pins;
use crate::settings::{FAN_COUNT, FanId};

pub struct FanBank {
    gpios: [i32; FAN_COUNT],
}

impl Default for FanBank {
    fn default() -> Self {
        Self::new()
    }
}

impl FanBank {
    pub fn new() -> Self {
        Self::with_pins(pins::FAN_GPIOS)
    }

    pub fn with_pins(gpios: [i32; FAN_COUNT]) -> Self {
        Self { gpios }
    }

    pub fn set(&mut self, fan: FanId, on: bool) {
        hw_init::gpio_write(self.gpios[fan.index()], on);
    }
}
