//! Photoresistor light sensor for the solar gate.
//!
//! Reads the light ADC1 channel via the oneshot API (initialised by hw_init) and
//! narrows the 12-bit result to the 10-bit scale the conversions expect.
//! On host/test hw_init serves the conversion from an injectable value.

use crate::drivers::hw_init;
use crate::pins;

/// Full scale of [`LightSensor::read`].
pub const LIGHT_RAW_MAX: u16 = 1023;

/// Inject a 10-bit light level for the next host-side read.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_adc(raw: u16) {
    hw_init::sim_set_adc(raw.min(LIGHT_RAW_MAX) << 2);
}

#[derive(Default)]
pub struct LightSensor;

impl LightSensor {
    pub fn new() -> Self {
        Self
    }

    /// 10-bit light level, 0–1023.
    pub fn read(&self) -> u16 {
        narrow(hw_init::adc1_read(pins::LIGHT_ADC1_CHANNEL))
    }
}

/// 12-bit ADC sample → 10-bit light level.
fn narrow(raw12: u16) -> u16 {
    (raw12 >> 2).min(LIGHT_RAW_MAX)
}
