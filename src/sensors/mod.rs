//! Sensor subsystem: individual drivers, unit conversions, and the
//! aggregating [`SensorHub`].
//!
//! Drivers return raw physical values (°C, %RH, 10-bit light).  The
//! conversions into the integer units the thresholds use live here so the
//! control loop and the tests share one definition.

pub mod climate;
pub mod light;

use climate::ClimateSensor;
use light::LightSensor;

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

/// °C → °F, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
pub fn celsius_to_fahrenheit(celsius: f32) -> i32 {
    (celsius * 1.8 + 32.0) as i32
}

/// Raw 10-bit light reading → 0–100 scale, used once at startup.
#[allow(clippy::cast_possible_truncation)]
pub fn light_level_startup(raw: u16) -> i32 {
    (f32::from(raw) / 10.23) as i32
}

/// Raw 10-bit light reading → even-valued 0–100 scale, used every
/// refresh after startup.
#[allow(clippy::cast_possible_truncation)]
pub fn light_level(raw: u16) -> i32 {
    ((f32::from(raw) / 20.46) as i32) * 2
}

/// Whole-unit value of a reading, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
pub fn truncate(value: f32) -> i32 {
    value as i32
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Aggregates all sensor drivers.  The hardware adapter forwards the
/// [`SensorPort`](crate::app::ports::SensorPort) calls here.
pub struct SensorHub {
    pub climate: ClimateSensor,
    pub light: LightSensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(climate: ClimateSensor, light: LightSensor) -> Self {
        Self { climate, light }
    }

    pub fn temperature_celsius(&mut self) -> f32 {
        self.climate.read().celsius
    }

    pub fn humidity_percent(&mut self) -> f32 {
        self.climate.read().humidity
    }

    pub fn light_raw(&mut self) -> u16 {
        self.light.read()
    }
}
