//! User settings: thresholds, per-fan modes, and the power-source mode.
//!
//! Modes are closed enums with total forward/backward cycle functions and
//! a clamping byte decoder, so an out-of-range stored byte can never
//! become an invalid in-memory state.
//!
//! ## Byte encoding
//!
//! | Byte | FanMode | PowerMode  |
//! |------|---------|------------|
//! | 0    | Off     | Off        |
//! | 1    | On      | On         |
//! | 2    | Auto    | SolarGated |
//! | 3+   | Auto    | SolarGated |

pub mod store;

/// Number of independently controlled fans.
pub const FAN_COUNT: usize = 4;

/// Lowest value a threshold can be edited down to.
pub const THRESHOLD_MIN: u8 = 1;
/// Highest value a threshold can hold (edits saturate, loads clamp).
pub const THRESHOLD_MAX: u8 = 99;

// ---------------------------------------------------------------------------
// Fan mode
// ---------------------------------------------------------------------------

/// Per-fan behaviour selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FanMode {
    Off = 0,
    On = 1,
    /// Follow the temperature/humidity thresholds.
    Auto = 2,
}

impl FanMode {
    /// Decode a stored byte; anything past the last variant is `Auto`.
    pub const fn from_byte(raw: u8) -> Self {
        match raw {
            0 => Self::Off,
            1 => Self::On,
            _ => Self::Auto,
        }
    }

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Clockwise edit: Auto → On → Off → Auto.
    pub const fn forward(self) -> Self {
        match self {
            Self::Auto => Self::On,
            Self::On => Self::Off,
            Self::Off => Self::Auto,
        }
    }

    /// Counter-clockwise edit: Auto → Off → On → Auto.
    pub const fn backward(self) -> Self {
        match self {
            Self::Auto => Self::Off,
            Self::Off => Self::On,
            Self::On => Self::Auto,
        }
    }

    /// Word shown on the fan screen.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

// ---------------------------------------------------------------------------
// Power mode
// ---------------------------------------------------------------------------

/// Global power-source gate applied before any per-fan decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PowerMode {
    Off = 0,
    On = 1,
    /// Fans may only run while the light level meets its threshold.
    SolarGated = 2,
}

impl PowerMode {
    /// Decode a stored byte; anything past the last variant is `SolarGated`.
    pub const fn from_byte(raw: u8) -> Self {
        match raw {
            0 => Self::Off,
            1 => Self::On,
            _ => Self::SolarGated,
        }
    }

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Clockwise edit: SolarGated → On → Off → SolarGated.
    pub const fn forward(self) -> Self {
        match self {
            Self::SolarGated => Self::On,
            Self::On => Self::Off,
            Self::Off => Self::SolarGated,
        }
    }

    /// Counter-clockwise edit: SolarGated → Off → On → SolarGated.
    pub const fn backward(self) -> Self {
        match self {
            Self::SolarGated => Self::Off,
            Self::Off => Self::On,
            Self::On => Self::SolarGated,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SolarGated => "SOLAR",
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Which of the three editable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    Temperature,
    Humidity,
    Light,
}

/// One of the four fan outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanId {
    Fan1,
    Fan2,
    Fan3,
    Fan4,
}

impl FanId {
    pub const ALL: [Self; FAN_COUNT] = [Self::Fan1, Self::Fan2, Self::Fan3, Self::Fan4];

    /// Zero-based slot index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-based number printed on the display and in logs.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Screen title, e.g. "Fan 3".
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fan1 => "Fan 1",
            Self::Fan2 => "Fan 2",
            Self::Fan3 => "Fan 3",
            Self::Fan4 => "Fan 4",
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Threshold set-points widened for comparison against readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Fahrenheit.
    pub temperature: i32,
    /// Percent relative humidity.
    pub humidity: i32,
    /// Normalised 0–99 light level.
    pub light: i32,
}

/// The complete persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub temperature_threshold: u8,
    pub humidity_threshold: u8,
    pub light_threshold: u8,
    pub fan_modes: [FanMode; FAN_COUNT],
    pub power_mode: PowerMode,
}

impl Default for Settings {
    /// Factory defaults written on first boot.
    fn default() -> Self {
        Self {
            temperature_threshold: 78,
            humidity_threshold: 85,
            light_threshold: 30,
            fan_modes: [FanMode::Auto; FAN_COUNT],
            power_mode: PowerMode::On,
        }
    }
}

impl Settings {
    pub fn threshold(&self, which: Threshold) -> u8 {
        match which {
            Threshold::Temperature => self.temperature_threshold,
            Threshold::Humidity => self.humidity_threshold,
            Threshold::Light => self.light_threshold,
        }
    }

    pub fn set_threshold(&mut self, which: Threshold, value: u8) {
        match which {
            Threshold::Temperature => self.temperature_threshold = value,
            Threshold::Humidity => self.humidity_threshold = value,
            Threshold::Light => self.light_threshold = value,
        }
    }

    pub fn fan_mode(&self, fan: FanId) -> FanMode {
        self.fan_modes[fan.index()]
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            temperature: i32::from(self.temperature_threshold),
            humidity: i32::from(self.humidity_threshold),
            light: i32::from(self.light_threshold),
        }
    }
}
