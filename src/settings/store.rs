//! Write-through settings persistence over a [`StoragePort`].
//!
//! ## Layout
//!
//! | Address | Field                 |
//! |---------|-----------------------|
//! | 0..2    | format marker (u16)   |
//! | 10      | temperature threshold |
//! | 11      | humidity threshold    |
//! | 12      | light threshold       |
//! | 13..=16 | fan 1–4 mode          |
//! | 17      | power mode            |
//!
//! A marker mismatch means first boot (or garbage); every field is
//! rewritten with defaults and the marker goes last, so a power cut during
//! initialisation is detected again on the next boot.

use log::{info, warn};

use super::{FanId, FanMode, PowerMode, Settings, THRESHOLD_MAX, Threshold};
use crate::app::ports::StoragePort;
use crate::error::StorageError;

/// Value of the format marker once defaults have been written.
pub const FORMAT_MARKER: u16 = 27381;

pub const MARKER_ADDR: u16 = 0;
pub const TEMPERATURE_ADDR: u16 = 10;
pub const HUMIDITY_ADDR: u16 = 11;
pub const LIGHT_ADDR: u16 = 12;
pub const FAN_ADDRS: [u16; 4] = [13, 14, 15, 16];
pub const POWER_ADDR: u16 = 17;

/// Address of a threshold byte.
pub const fn threshold_addr(which: Threshold) -> u16 {
    match which {
        Threshold::Temperature => TEMPERATURE_ADDR,
        Threshold::Humidity => HUMIDITY_ADDR,
        Threshold::Light => LIGHT_ADDR,
    }
}

/// Owns the storage backend and the in-memory copy of the settings.
pub struct SettingsStore<S> {
    storage: S,
    settings: Settings,
}

impl<S: StoragePort> SettingsStore<S> {
    /// Load settings from `storage`.  Never fails: if the backend errors,
    /// the controller runs on defaults and edits are retried on write.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            settings: Settings::default(),
        };
        if let Err(e) = store.load() {
            warn!("SettingsStore: load failed ({}), running on defaults", e);
            store.settings = Settings::default();
        }
        store
    }

    /// Read (or initialise) every field and cache the result.
    pub fn load(&mut self) -> Result<Settings, StorageError> {
        let marker = self.storage.read_marker()?;
        if marker != FORMAT_MARKER {
            info!("SettingsStore: marker {:#06x} absent, writing defaults", marker);
            self.write_defaults()?;
            self.settings = Settings::default();
            return Ok(self.settings);
        }

        let mut settings = Settings::default();
        for which in [Threshold::Temperature, Threshold::Humidity, Threshold::Light] {
            let raw = self.storage.read_byte(threshold_addr(which))?;
            if raw > THRESHOLD_MAX {
                warn!("SettingsStore: {:?} threshold {} clamped to {}", which, raw, THRESHOLD_MAX);
            }
            settings.set_threshold(which, raw.min(THRESHOLD_MAX));
        }

        for fan in FanId::ALL {
            let raw = self.storage.read_byte(FAN_ADDRS[fan.index()])?;
            let mode = FanMode::from_byte(raw);
            if mode.to_byte() != raw {
                warn!("SettingsStore: fan {} mode byte {} clamped to {:?}", fan.number(), raw, mode);
            }
            settings.fan_modes[fan.index()] = mode;
        }

        let raw = self.storage.read_byte(POWER_ADDR)?;
        settings.power_mode = PowerMode::from_byte(raw);
        if settings.power_mode.to_byte() != raw {
            warn!("SettingsStore: power mode byte {} clamped to {:?}", raw, settings.power_mode);
        }

        info!("SettingsStore: loaded {:?}", settings);
        self.settings = settings;
        Ok(settings)
    }

    /// Current in-memory settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist one threshold.  The caller keeps `value` within 1–99.
    pub fn write_threshold(&mut self, which: Threshold, value: u8) -> Result<(), StorageError> {
        self.settings.set_threshold(which, value);
        self.storage.write_byte(threshold_addr(which), value)
    }

    pub fn write_fan_mode(&mut self, fan: FanId, mode: FanMode) -> Result<(), StorageError> {
        self.settings.fan_modes[fan.index()] = mode;
        self.storage.write_byte(FAN_ADDRS[fan.index()], mode.to_byte())
    }

    pub fn write_power_mode(&mut self, mode: PowerMode) -> Result<(), StorageError> {
        self.settings.power_mode = mode;
        self.storage.write_byte(POWER_ADDR, mode.to_byte())
    }

    /// Borrow the backend (diagnostics and tests).
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn write_defaults(&mut self) -> Result<(), StorageError> {
        let d = Settings::default();
        self.storage.write_byte(TEMPERATURE_ADDR, d.temperature_threshold)?;
        self.storage.write_byte(HUMIDITY_ADDR, d.humidity_threshold)?;
        self.storage.write_byte(LIGHT_ADDR, d.light_threshold)?;
        for fan in FanId::ALL {
            self.storage
                .write_byte(FAN_ADDRS[fan.index()], d.fan_mode(fan).to_byte())?;
        }
        self.storage.write_byte(POWER_ADDR, d.power_mode.to_byte())?;
        self.storage.write_marker(FORMAT_MARKER)
    }
}
