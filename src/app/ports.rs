//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (sensors, pins, fans, storage, display, clock) implement
//! these traits.  The [`Controller`](super::service::Controller) consumes
//! them via generics, so the domain core never touches hardware directly.

use embedded_hal::digital::PinState;

use crate::error::{DisplayError, StorageError};
use crate::menu::View;
use crate::settings::FanId;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw sensor acquisition.  Unit conversion is the domain's job.
///
/// Readings are assumed usable; a failed transfer is reported as a
/// non-finite value and the controller skips it.
pub trait SensorPort {
    /// Air temperature in degrees Celsius.
    fn read_temperature_celsius(&mut self) -> f32;

    /// Relative humidity in percent.
    fn read_humidity_percent(&mut self) -> f32;

    /// Light level on a 10-bit scale (0–1023).
    fn read_light_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: pins → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced levels of the operator controls.
pub trait InputPort {
    /// Encoder push switch (active-low).
    fn button_level(&mut self) -> PinState;

    /// Encoder clock phase (CLK).
    fn encoder_clock(&mut self) -> PinState;

    /// Encoder data phase (DT).
    fn encoder_data(&mut self) -> PinState;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    /// Switch one fan output on or off.
    fn set_fan_output(&mut self, fan: FanId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ EEPROM / NVS)
// ───────────────────────────────────────────────────────────────

/// Byte-addressed persistent storage with a reserved format marker.
///
/// Each call is a single synchronous write; implementations must make a
/// single-byte write atomic.  There is no multi-field transaction.
pub trait StoragePort {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError>;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError>;

    /// Read the format marker from its reserved address.  Never-written
    /// storage returns whatever the erased cells hold.
    fn read_marker(&self) -> Result<u16, StorageError>;

    fn write_marker(&mut self, marker: u16) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → renderer)
// ───────────────────────────────────────────────────────────────

/// The domain supplies semantic content only; layout is the adapter's job.
pub trait DisplayPort {
    fn render(&mut self, view: &View) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Free-running counters since boot.  Both wrap silently at `u32::MAX`.
pub trait ClockPort {
    fn millis(&self) -> u32;

    fn micros(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
