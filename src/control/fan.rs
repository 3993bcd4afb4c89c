//! Fan on/off decision logic.
//!
//! ```text
//!  power Off ──────────────────────────────▶ OFF
//!  power SolarGated && light < light_thr ──▶ OFF
//!  fan On ─────────────────────────────────▶ ON
//!  fan Off ────────────────────────────────▶ OFF
//!  fan Auto ── temp >= thr || hum >= thr ──▶ ON / OFF
//! ```
//!
//! Re-evaluated every control cycle for every fan; no hysteresis and no
//! minimum dwell beyond the threshold comparison itself.

use crate::settings::{FAN_COUNT, FanId, FanMode, PowerMode, Settings, Thresholds};

/// Current filtered readings in the units the thresholds use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readings {
    /// Averaged temperature, °F.
    pub temperature: i32,
    /// Truncated relative humidity, %.
    pub humidity: i32,
    /// Averaged light level, 0–99.
    pub light: i32,
}

/// Decide whether a single fan should run.
pub fn decide(power: PowerMode, mode: FanMode, readings: &Readings, thresholds: &Thresholds) -> bool {
    let gated = match power {
        PowerMode::Off => true,
        PowerMode::SolarGated => readings.light < thresholds.light,
        PowerMode::On => false,
    };
    if gated {
        return false;
    }

    match mode {
        FanMode::On => true,
        FanMode::Off => false,
        FanMode::Auto => {
            readings.temperature >= thresholds.temperature || readings.humidity >= thresholds.humidity
        }
    }
}

/// Decide every fan from the current settings.
pub fn decide_all(settings: &Settings, readings: &Readings) -> [bool; FAN_COUNT] {
    let thresholds = settings.thresholds();
    FanId::ALL.map(|fan| decide(settings.power_mode, settings.fan_mode(fan), readings, &thresholds))
}
