//! Application service: the hexagonal core.
//!
//! [`Controller`] owns the settings store, the menu, the input decoders
//! and the sensor filters.  All I/O flows through port traits injected at
//! call sites, making the entire loop testable with mock adapters.
//!
//! ```text
//!  InputPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  SensorPort ─▶ │        Controller        │ ──▶ DisplayPort
//! ActuatorPort ◀─│ Menu · Filters · Fans    │ ◀─▶ StoragePort
//!                └──────────────────────────┘
//! ```
//!
//! ## Cycle order
//!
//! 1. button → debouncer → menu (edit toggle)
//! 2. encoder → decoder → menu (navigate / edit + persist)
//! 3. light refresh, if its interval elapsed
//! 4. climate refresh, if its interval elapsed
//! 5. render the current screen
//! 6. decide and drive all fans
//!
//! Input is handled before the fan decision, so an edit made this cycle
//! already shapes this cycle's outputs.

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::control::fan::{Readings, decide_all};
use crate::control::sample_buffer::SampleBuffer;
use crate::control::timing::IntervalGate;
use crate::drivers::button::InputDebouncer;
use crate::drivers::encoder::{Direction, EncoderDecoder};
use crate::menu::{Binding, Menu, MenuChange, View};
use crate::sensors::{celsius_to_fahrenheit, light_level, light_level_startup, truncate};
use crate::settings::store::SettingsStore;
use crate::settings::{FAN_COUNT, FanId, Settings};

use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, InputPort, SensorPort, StoragePort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The control loop state.  One instance for the lifetime of the firmware.
pub struct Controller<S> {
    store: SettingsStore<S>,
    menu: Menu,
    button: InputDebouncer,
    encoder: EncoderDecoder,
    temperature: SampleBuffer,
    light: SampleBuffer,
    readings: Readings,
    /// Truncated °C of the last accepted reading; `None` until one arrives.
    last_celsius: Option<i32>,
    last_humidity: Option<i32>,
    climate_gate: IntervalGate,
    light_gate: IntervalGate,
    fan_outputs: [bool; FAN_COUNT],
    cycle_count: u64,
}

impl<S: StoragePort> Controller<S> {
    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the loop up: fans off, filters seeded from one reading,
    /// input decoders seeded from the live pin levels, interval gates
    /// armed at the current time.
    pub fn start(
        config: ControllerConfig,
        store: SettingsStore<S>,
        hw: &mut (impl SensorPort + InputPort + ActuatorPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Self {
        for fan in FanId::ALL {
            hw.set_fan_output(fan, false);
        }

        let now_us = clock.micros();
        let mut ctl = Self {
            store,
            menu: Menu::new(),
            button: InputDebouncer::with_settle(hw.button_level(), config.debounce_ms),
            encoder: EncoderDecoder::new(hw.encoder_clock()),
            temperature: SampleBuffer::seeded(0),
            light: SampleBuffer::seeded(0),
            readings: Readings::default(),
            last_celsius: None,
            last_humidity: None,
            climate_gate: IntervalGate::new(config.climate_interval_us, now_us),
            light_gate: IntervalGate::new(config.light_interval_us, now_us),
            fan_outputs: [false; FAN_COUNT],
            cycle_count: 0,
        };

        let level = light_level_startup(hw.read_light_raw());
        ctl.light.seed(level);
        ctl.readings.light = level;
        ctl.refresh_climate(hw);

        let settings = *ctl.store.settings();
        sink.emit(&AppEvent::Started(settings));
        info!(
            "Controller started: {}F {}% light {}",
            ctl.readings.temperature, ctl.readings.humidity, ctl.readings.light
        );
        ctl
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle.
    ///
    /// The `hw` parameter satisfies the sensor, input and actuator ports
    /// at once; this avoids a double mutable borrow while keeping the
    /// port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + InputPort + ActuatorPort),
        display: &mut impl DisplayPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Button
        let pressed = self.button.update(hw.button_level(), clock.millis());
        if pressed.is_falling_edge() {
            let change = self.menu.toggle_edit();
            self.publish(change, sink);
        }

        // 2. Encoder
        if let Some(dir) = self.encoder.update(hw.encoder_clock(), hw.encoder_data()) {
            self.handle_rotation(dir, sink);
        }

        // 3/4. Sensors
        let now_us = clock.micros();
        if self.light_gate.poll(now_us) {
            let level = light_level(hw.read_light_raw());
            self.readings.light = self.light.push(level);
        }
        if self.climate_gate.poll(now_us) {
            self.refresh_climate(hw);
        }

        // 5. Display
        if let Err(e) = display.render(&self.view()) {
            warn!("Display render failed: {}", e);
        }

        // 6. Fans
        self.apply_fans(hw, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// What the display shows right now.
    pub fn view(&self) -> View {
        self.menu.view(self.store.settings(), &self.readings)
    }

    /// Last commanded state of each fan output.
    pub fn fan_outputs(&self) -> [bool; FAN_COUNT] {
        self.fan_outputs
    }

    /// Total cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_rotation(&mut self, dir: Direction, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Rotated(dir));
        match self.menu.rotate(dir, &mut self.store) {
            Ok(change) => self.publish(change, sink),
            Err(e) => {
                // The in-memory setting already holds the edit.
                warn!("Settings write failed: {}", e);
                self.publish(self.last_edit(), sink);
            }
        }
    }

    /// Describe the current value of the edited field.  Used after a
    /// failed persist, when `rotate` could not report the change.
    fn last_edit(&self) -> MenuChange {
        let settings = self.store.settings();
        match self.menu.screen().binding() {
            Binding::Threshold(which) => MenuChange::Threshold {
                which,
                value: settings.threshold(which),
            },
            Binding::Fan(fan) => MenuChange::FanMode {
                fan,
                mode: settings.fan_mode(fan),
            },
            Binding::Power => MenuChange::PowerMode(settings.power_mode),
        }
    }

    fn publish(&self, change: MenuChange, sink: &mut impl EventSink) {
        let event = match change {
            MenuChange::EditMode(on) => AppEvent::EditModeChanged(on),
            MenuChange::Screen(screen) => AppEvent::ScreenChanged(screen),
            MenuChange::Threshold { which, value } => AppEvent::ThresholdChanged { which, value },
            MenuChange::FanMode { fan, mode } => AppEvent::FanModeChanged { fan, mode },
            MenuChange::PowerMode(mode) => AppEvent::PowerModeChanged(mode),
            MenuChange::Unchanged => return,
        };
        sink.emit(&event);
    }

    /// Read temperature and humidity.  Each value is only taken when its
    /// truncated whole-unit reading changed; the first finite reading
    /// seeds the temperature filter.
    fn refresh_climate(&mut self, hw: &mut impl SensorPort) {
        let celsius = hw.read_temperature_celsius();
        if celsius.is_finite() {
            let whole = truncate(celsius);
            let fahrenheit = celsius_to_fahrenheit(celsius);
            match self.last_celsius {
                None => {
                    self.temperature.seed(fahrenheit);
                    self.readings.temperature = fahrenheit;
                }
                Some(prev) if prev != whole => {
                    self.readings.temperature = self.temperature.push(fahrenheit);
                }
                Some(_) => {}
            }
            self.last_celsius = Some(whole);
        } else {
            warn!("Temperature reading not finite, keeping {}F", self.readings.temperature);
        }

        let humidity = hw.read_humidity_percent();
        if humidity.is_finite() {
            let whole = truncate(humidity);
            if self.last_humidity != Some(whole) {
                debug!("Humidity {}%", whole);
                self.readings.humidity = whole;
                self.last_humidity = Some(whole);
            }
        } else {
            warn!("Humidity reading not finite, keeping {}%", self.readings.humidity);
        }
    }

    /// Drive every fan from the current settings and readings.
    fn apply_fans(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let outputs = decide_all(self.store.settings(), &self.readings);
        for fan in FanId::ALL {
            let on = outputs[fan.index()];
            hw.set_fan_output(fan, on);
            if on != self.fan_outputs[fan.index()] {
                sink.emit(&AppEvent::FanOutputChanged { fan, on });
            }
        }
        self.fan_outputs = outputs;
    }
}
