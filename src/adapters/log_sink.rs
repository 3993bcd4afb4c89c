//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::encoder::Direction;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!(
                    "START | temp={}F hum={}% light={} | fans={:?} | power={}",
                    s.temperature_threshold,
                    s.humidity_threshold,
                    s.light_threshold,
                    s.fan_modes.map(|m| m.label()),
                    s.power_mode.label(),
                );
            }
            AppEvent::Rotated(dir) => {
                debug!(
                    "{}",
                    match dir {
                        Direction::Clockwise => "CW",
                        Direction::CounterClockwise => "CCW",
                    }
                );
            }
            AppEvent::EditModeChanged(on) => {
                info!("{}", if *on { "EDIT" } else { "DISPLAY" });
            }
            AppEvent::ScreenChanged(screen) => {
                info!("SCREEN | {:?}", screen);
            }
            AppEvent::ThresholdChanged { which, value } => {
                info!("SET | {:?} threshold -> {}", which, value);
            }
            AppEvent::FanModeChanged { fan, mode } => {
                info!("SET | fan {} -> {}", fan.number(), mode.label());
            }
            AppEvent::PowerModeChanged(mode) => {
                info!("SET | power -> {}", mode.label());
            }
            AppEvent::FanOutputChanged { fan, on } => {
                info!("FAN | {} -> {}", fan.number(), if *on { "ON" } else { "OFF" });
            }
        }
    }
}
