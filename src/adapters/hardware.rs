//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the [`FanBank`], and samples the encoder
//! pins, exposing them through [`SensorPort`], [`InputPort`] and
//! [`ActuatorPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_hal::digital::PinState;

use crate::app::ports::{ActuatorPort, InputPort, SensorPort};
use crate::drivers::fans::FanBank;
use crate::drivers::hw_init;
use crate::pins;
use crate::sensors::SensorHub;
use crate::settings::FanId;

/// Encoder pin assignment.
#[derive(Debug, Clone, Copy)]
pub struct EncoderPins {
    pub clock: i32,
    pub data: i32,
    pub switch: i32,
}

impl Default for EncoderPins {
    fn default() -> Self {
        Self {
            clock: pins::ENC_CLK_GPIO,
            data: pins::ENC_DT_GPIO,
            switch: pins::ENC_SW_GPIO,
        }
    }
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    fans: FanBank,
    encoder: EncoderPins,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, fans: FanBank, encoder: EncoderPins) -> Self {
        Self {
            sensor_hub,
            fans,
            encoder,
        }
    }
}

fn level(pin: i32) -> PinState {
    PinState::from(hw_init::gpio_read(pin))
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_temperature_celsius(&mut self) -> f32 {
        self.sensor_hub.temperature_celsius()
    }

    fn read_humidity_percent(&mut self) -> f32 {
        self.sensor_hub.humidity_percent()
    }

    fn read_light_raw(&mut self) -> u16 {
        self.sensor_hub.light_raw()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn button_level(&mut self) -> PinState {
        level(self.encoder.switch)
    }

    fn encoder_clock(&mut self) -> PinState {
        level(self.encoder.clock)
    }

    fn encoder_data(&mut self) -> PinState {
        level(self.encoder.data)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_fan_output(&mut self, fan: FanId, on: bool) {
        self.fans.set(fan, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::climate::ClimateSensor;
    use crate::sensors::light::LightSensor;

    fn adapter() -> HardwareAdapter {
        // Spare pins so the shared simulated bitmasks do not collide with
        // other tests.
        HardwareAdapter::new(
            SensorHub::new(ClimateSensor::new(), LightSensor::new()),
            FanBank::with_pins([33, 34, 35, 36]),
            EncoderPins {
                clock: 37,
                data: 38,
                switch: 39,
            },
        )
    }

    #[test]
    fn inputs_follow_pin_levels() {
        let mut hw = adapter();
        assert_eq!(hw.button_level(), PinState::High);
        hw_init::sim_set_gpio(39, false);
        assert_eq!(hw.button_level(), PinState::Low);
        hw_init::sim_set_gpio(37, false);
        assert_eq!(hw.encoder_clock(), PinState::Low);
        assert_eq!(hw.encoder_data(), PinState::High);
        hw_init::sim_set_gpio(39, true);
        hw_init::sim_set_gpio(37, true);
    }

    #[test]
    fn fan_output_reaches_the_pin() {
        let mut hw = adapter();
        hw.set_fan_output(FanId::Fan4, true);
        assert!(hw_init::sim_gpio_output(36));
        hw.set_fan_output(FanId::Fan4, false);
        assert!(!hw_init::sim_gpio_output(36));
    }
}
