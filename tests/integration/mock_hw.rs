//! Mock adapters for integration tests.
//!
//! Every port the controller talks to has a recording stand-in here, so
//! tests can drive the pins and sensors by hand and assert on what came
//! out the other side.

use std::cell::Cell;

use embedded_hal::digital::PinState;
use ventctl::app::events::AppEvent;
use ventctl::app::ports::{
    ActuatorPort, ClockPort, DisplayPort, EventSink, InputPort, SensorPort, StoragePort,
};
use ventctl::drivers::encoder::Direction;
use ventctl::error::{DisplayError, StorageError};
use ventctl::menu::View;
use ventctl::settings::{FAN_COUNT, FanId};

// ── MockHardware ──────────────────────────────────────────────

/// Sensors, operator inputs and fan outputs in one struct, like the
/// real hardware adapter.
pub struct MockHardware {
    pub celsius: f32,
    pub humidity: f32,
    pub light_raw: u16,
    pub button: PinState,
    pub clock_pin: PinState,
    pub data_pin: PinState,
    pub fans: [bool; FAN_COUNT],
    pub fan_calls: Vec<(FanId, bool)>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Idle inputs (pulled high) and a mild, dark-ish room.
    pub fn new() -> Self {
        Self {
            celsius: 20.0,
            humidity: 50.0,
            light_raw: 512,
            button: PinState::High,
            clock_pin: PinState::High,
            data_pin: PinState::High,
            fans: [false; FAN_COUNT],
            fan_calls: Vec::new(),
        }
    }

    /// Move the encoder by one detent.  The data phase leads the clock
    /// phase on a clockwise turn.
    pub fn turn(&mut self, dir: Direction) {
        self.clock_pin = !self.clock_pin;
        self.data_pin = match dir {
            Direction::Clockwise => !self.clock_pin,
            Direction::CounterClockwise => self.clock_pin,
        };
    }

    pub fn fans_on(&self) -> usize {
        self.fans.iter().filter(|on| **on).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature_celsius(&mut self) -> f32 {
        self.celsius
    }

    fn read_humidity_percent(&mut self) -> f32 {
        self.humidity
    }

    fn read_light_raw(&mut self) -> u16 {
        self.light_raw
    }
}

impl InputPort for MockHardware {
    fn button_level(&mut self) -> PinState {
        self.button
    }

    fn encoder_clock(&mut self) -> PinState {
        self.clock_pin
    }

    fn encoder_data(&mut self) -> PinState {
        self.data_pin
    }
}

impl ActuatorPort for MockHardware {
    fn set_fan_output(&mut self, fan: FanId, on: bool) {
        self.fans[fan.index()] = on;
        self.fan_calls.push((fan, on));
    }
}

// ── MockStorage ───────────────────────────────────────────────

/// What reached the backing store, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageWrite {
    Byte { addr: u16, value: u8 },
    Marker(u16),
}

/// Erased 32-byte EEPROM image.
pub struct MockStorage {
    pub bytes: [u8; 32],
    pub writes: Vec<StorageWrite>,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

#[allow(dead_code)]
impl MockStorage {
    pub fn erased() -> Self {
        Self {
            bytes: [0xFF; 32],
            writes: Vec::new(),
            fail_writes: false,
            fail_reads: false,
        }
    }

    pub fn byte_writes(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, StorageWrite::Byte { .. }))
            .count()
    }
}

impl StoragePort for MockStorage {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Io);
        }
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::OutOfBounds(addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(StorageError::OutOfBounds(addr))?;
        *slot = value;
        self.writes.push(StorageWrite::Byte { addr, value });
        Ok(())
    }

    fn read_marker(&self) -> Result<u16, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Io);
        }
        Ok(u16::from_le_bytes([self.bytes[0], self.bytes[1]]))
    }

    fn write_marker(&mut self, marker: u16) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        self.bytes[..2].copy_from_slice(&marker.to_le_bytes());
        self.writes.push(StorageWrite::Marker(marker));
        Ok(())
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub views: Vec<View>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last(&self) -> Option<&View> {
        self.views.last()
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, view: &View) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Bus);
        }
        self.views.push(*view);
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Hand-driven counters.
#[derive(Default)]
pub struct MockClock {
    pub ms: Cell<u32>,
    pub us: Cell<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(ms: u32, us: u32) -> Self {
        Self {
            ms: Cell::new(ms),
            us: Cell::new(us),
        }
    }

    pub fn set_ms(&self, ms: u32) {
        self.ms.set(ms);
    }

    pub fn set_us(&self, us: u32) {
        self.us.set(us);
    }

    pub fn advance_us(&self, delta: u32) {
        self.us.set(self.us.get().wrapping_add(delta));
    }
}

impl ClockPort for MockClock {
    fn millis(&self) -> u32 {
        self.ms.get()
    }

    fn micros(&self) -> u32 {
        self.us.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
