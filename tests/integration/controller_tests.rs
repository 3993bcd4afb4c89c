//! Full control-loop tests: inputs in, settings/events/fans out.

use embedded_hal::digital::PinState;
use ventctl::app::events::AppEvent;
use ventctl::app::service::Controller;
use ventctl::config::ControllerConfig;
use ventctl::drivers::encoder::Direction;
use ventctl::menu::{Screen, ScreenContent};
use ventctl::settings::store::{TEMPERATURE_ADDR, SettingsStore};
use ventctl::settings::{FanId, FanMode, Threshold};

use crate::mock_hw::{MockClock, MockDisplay, MockHardware, MockStorage, RecordingSink, StorageWrite};

/// Half a second plus one tick.
const REFRESH_US: u32 = 500_001;

struct Rig {
    ctl: Controller<MockStorage>,
    hw: MockHardware,
    display: MockDisplay,
    clock: MockClock,
    sink: RecordingSink,
}

impl Rig {
    fn start(hw: MockHardware) -> Self {
        Self::start_with(hw, MockStorage::erased(), MockClock::default())
    }

    fn start_with(mut hw: MockHardware, storage: MockStorage, clock: MockClock) -> Self {
        let mut sink = RecordingSink::new();
        let store = SettingsStore::open(storage);
        let ctl = Controller::start(ControllerConfig::default(), store, &mut hw, &clock, &mut sink);
        Self {
            ctl,
            hw,
            display: MockDisplay::default(),
            clock,
            sink,
        }
    }

    fn tick(&mut self) {
        self.ctl
            .tick(&mut self.hw, &mut self.display, &self.clock, &mut self.sink);
    }

    /// Hold the button down long enough to commit, then release it.
    fn press(&mut self) {
        let t = self.clock.ms.get();
        self.hw.button = PinState::Low;
        self.clock.set_ms(t + 1);
        self.tick();
        self.clock.set_ms(t + 60);
        self.tick();
        self.hw.button = PinState::High;
        self.clock.set_ms(t + 61);
        self.tick();
        self.clock.set_ms(t + 120);
        self.tick();
    }

    fn turn(&mut self, dir: Direction) {
        self.hw.turn(dir);
        self.tick();
    }
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn startup_writes_defaults_and_announces() {
    let rig = Rig::start(MockHardware::new());
    let storage = rig.ctl.store().storage();
    assert_eq!(storage.writes.last(), Some(&StorageWrite::Marker(27381)));
    assert!(matches!(rig.sink.events.first(), Some(AppEvent::Started(_))));
    // Every fan was forced off before anything else.
    assert!(rig.hw.fan_calls[..4].iter().all(|(_, on)| !on));
}

// ── Button ───────────────────────────────────────────────────

#[test]
fn press_commits_only_after_settle_time() {
    let mut rig = Rig::start(MockHardware::new());
    rig.sink.clear();

    rig.hw.button = PinState::Low;
    rig.clock.set_ms(10);
    rig.tick();
    rig.clock.set_ms(60);
    rig.tick();
    assert!(!rig.ctl.menu().is_editing(), "exactly 50 ms is not enough");

    rig.clock.set_ms(61);
    rig.tick();
    assert!(rig.ctl.menu().is_editing());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::EditModeChanged(true)), 1);

    // Holding does not toggle again; releasing does not toggle at all.
    rig.clock.set_ms(500);
    rig.tick();
    rig.hw.button = PinState::High;
    rig.clock.set_ms(600);
    rig.tick();
    assert!(rig.ctl.menu().is_editing());
}

#[test]
fn short_glitch_is_ignored() {
    let mut rig = Rig::start(MockHardware::new());
    rig.hw.button = PinState::Low;
    rig.clock.set_ms(100);
    rig.tick();
    rig.hw.button = PinState::High;
    rig.clock.set_ms(120);
    rig.tick();
    rig.clock.set_ms(400);
    rig.tick();
    assert!(!rig.ctl.menu().is_editing());
}

#[test]
fn second_press_leaves_edit_mode() {
    let mut rig = Rig::start(MockHardware::new());
    rig.press();
    rig.press();
    assert!(!rig.ctl.menu().is_editing());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::EditModeChanged(_))), 2);
}

// ── Encoder ──────────────────────────────────────────────────

#[test]
fn rotation_navigates_and_wraps() {
    let mut rig = Rig::start(MockHardware::new());
    rig.turn(Direction::Clockwise);
    assert_eq!(rig.ctl.menu().screen(), Screen::Humidity);
    rig.turn(Direction::CounterClockwise);
    rig.turn(Direction::CounterClockwise);
    assert_eq!(rig.ctl.menu().screen(), Screen::Power);
    rig.turn(Direction::Clockwise);
    assert_eq!(rig.ctl.menu().screen(), Screen::Temperature);

    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Rotated(_))), 4);
    assert!(rig.sink.events.contains(&AppEvent::ScreenChanged(Screen::Power)));
}

#[test]
fn idle_encoder_emits_nothing() {
    let mut rig = Rig::start(MockHardware::new());
    rig.sink.clear();
    for _ in 0..10 {
        rig.tick();
    }
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Rotated(_))), 0);
    assert_eq!(rig.ctl.menu().screen(), Screen::Temperature);
}

#[test]
fn edit_persists_threshold() {
    let mut rig = Rig::start(MockHardware::new());
    rig.press();
    rig.turn(Direction::Clockwise);

    assert_eq!(rig.ctl.settings().temperature_threshold, 79);
    assert_eq!(rig.ctl.store().storage().bytes[TEMPERATURE_ADDR as usize], 79);
    assert!(rig.sink.events.contains(&AppEvent::ThresholdChanged {
        which: Threshold::Temperature,
        value: 79,
    }));
    // Still on the same screen.
    assert_eq!(rig.ctl.menu().screen(), Screen::Temperature);
}

/// A formatted image holding factory defaults except the temperature
/// set point.
fn formatted(temperature: u8) -> MockStorage {
    let mut storage = MockStorage::erased();
    storage.bytes[..2].copy_from_slice(&27381u16.to_le_bytes());
    storage.bytes[10] = temperature;
    storage.bytes[11] = 85;
    storage.bytes[12] = 30;
    storage.bytes[13..17].copy_from_slice(&[2; 4]);
    storage.bytes[17] = 1;
    storage
}

#[test]
fn saturated_edit_writes_nothing() {
    let mut rig = Rig::start_with(MockHardware::new(), formatted(99), MockClock::default());
    assert_eq!(rig.ctl.settings().temperature_threshold, 99);

    rig.press();
    rig.turn(Direction::Clockwise);
    assert_eq!(rig.ctl.settings().temperature_threshold, 99);
    assert_eq!(rig.ctl.store().storage().byte_writes(), 0);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ThresholdChanged { .. })), 0);
}

#[test]
fn fan_mode_edit_cycles() {
    let mut rig = Rig::start(MockHardware::new());
    for _ in 0..3 {
        rig.turn(Direction::Clockwise);
    }
    assert_eq!(rig.ctl.menu().screen(), Screen::Fan1);
    rig.press();
    rig.turn(Direction::Clockwise);
    assert_eq!(rig.ctl.settings().fan_mode(FanId::Fan1), FanMode::On);
    rig.turn(Direction::Clockwise);
    assert_eq!(rig.ctl.settings().fan_mode(FanId::Fan1), FanMode::Off);
    assert_eq!(rig.ctl.store().storage().bytes[13], 0);
}

#[test]
fn failed_persist_still_applies_edit() {
    let mut storage = formatted(78);
    storage.fail_writes = true;
    let mut rig = Rig::start_with(MockHardware::new(), storage, MockClock::default());

    rig.press();
    rig.turn(Direction::CounterClockwise);
    assert_eq!(rig.ctl.settings().temperature_threshold, 77);
    assert_eq!(rig.ctl.store().storage().bytes[10], 78);
    assert!(rig.sink.events.contains(&AppEvent::ThresholdChanged {
        which: Threshold::Temperature,
        value: 77,
    }));
}

// ── Fans ─────────────────────────────────────────────────────

#[test]
fn edit_shapes_fans_in_the_same_cycle() {
    // 25 °C reads as 77 °F, one below the default set point.
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    let mut rig = Rig::start(hw);
    rig.tick();
    assert_eq!(rig.hw.fans_on(), 0);

    rig.press();
    rig.turn(Direction::CounterClockwise);
    assert_eq!(rig.ctl.settings().temperature_threshold, 77);
    assert_eq!(rig.hw.fans_on(), 4);
    assert_eq!(rig.ctl.fan_outputs(), [true; 4]);
}

#[test]
fn fan_events_only_on_change() {
    let mut hw = MockHardware::new();
    hw.humidity = 90.0;
    let mut rig = Rig::start(hw);
    rig.tick();
    rig.tick();
    rig.tick();
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::FanOutputChanged { on: true, .. })),
        4
    );
    // Outputs are still written every cycle.
    assert_eq!(rig.hw.fan_calls.len(), 4 + 3 * 4);
}

#[test]
fn display_failure_does_not_stop_fans() {
    let mut hw = MockHardware::new();
    hw.humidity = 90.0;
    let mut rig = Rig::start(hw);
    rig.display.fail = true;
    rig.tick();
    assert_eq!(rig.hw.fans_on(), 4);
    assert!(rig.display.views.is_empty());
}

#[test]
fn display_shows_current_screen() {
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    let mut rig = Rig::start(hw);
    rig.tick();
    let view = rig.display.last().copied().unwrap();
    assert_eq!(
        view.content,
        ScreenContent::Measurement {
            which: Threshold::Temperature,
            current: 77,
            set_point: 78,
        }
    );
    assert!(!view.editing);
    assert_eq!(view.title(), "Temperature");
}

// ── Sensors ──────────────────────────────────────────────────

#[test]
fn temperature_pushes_only_when_whole_degrees_change() {
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    let mut rig = Rig::start(hw);
    assert_eq!(rig.ctl.readings().temperature, 77);

    // 25.9 °C is 78.6 °F, but the whole-degree Celsius value did not move.
    rig.hw.celsius = 25.9;
    rig.clock.advance_us(REFRESH_US);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 77);

    // 60 °C = 140 °F: (31 * 77 + 140) / 32 = 78
    rig.hw.celsius = 60.0;
    rig.clock.advance_us(REFRESH_US);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 78);
}

#[test]
fn sensors_wait_for_their_interval() {
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    let mut rig = Rig::start(hw);
    rig.hw.celsius = 60.0;
    rig.hw.humidity = 70.0;
    rig.clock.set_us(500_000);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 77);
    assert_eq!(rig.ctl.readings().humidity, 50);

    rig.clock.set_us(500_001);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 78);
    assert_eq!(rig.ctl.readings().humidity, 70);
}

#[test]
fn non_finite_reading_is_skipped() {
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    hw.humidity = 40.0;
    let mut rig = Rig::start(hw);

    rig.hw.celsius = f32::NAN;
    rig.hw.humidity = f32::NAN;
    rig.clock.advance_us(REFRESH_US);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 77);
    assert_eq!(rig.ctl.readings().humidity, 40);
}

#[test]
fn light_uses_startup_then_steady_scaling() {
    let mut hw = MockHardware::new();
    hw.light_raw = 320;
    let mut rig = Rig::start(hw);
    // 320 / 10.23 = 31
    assert_eq!(rig.ctl.readings().light, 31);

    // 320 / 20.46 = 15 → 30; (31 * 31 + 30) / 32 = 30
    rig.clock.advance_us(REFRESH_US);
    rig.tick();
    assert_eq!(rig.ctl.readings().light, 30);
}

#[test]
fn wrapped_microsecond_counter_refreshes_immediately() {
    let mut hw = MockHardware::new();
    hw.celsius = 25.0;
    let mut rig = Rig::start_with(hw, MockStorage::erased(), MockClock::at(0, u32::MAX - 10));

    rig.hw.celsius = 60.0;
    rig.clock.set_us(5);
    rig.tick();
    assert_eq!(rig.ctl.readings().temperature, 78);
}

#[test]
fn cycle_count_tracks_ticks() {
    let mut rig = Rig::start(MockHardware::new());
    for _ in 0..5 {
        rig.tick();
    }
    assert_eq!(rig.ctl.cycle_count(), 5);
}
