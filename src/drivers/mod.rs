//! Input decoders, actuator drivers, hardware initialisation, and
//! peripheral helpers.

pub mod button;
pub mod encoder;
pub mod fans;
pub mod hw_init;
pub mod oled;
