//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; on the device they become log lines.

use crate::drivers::encoder::Direction;
use crate::menu::Screen;
use crate::settings::{FanId, FanMode, PowerMode, Settings, Threshold};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries the loaded settings).
    Started(Settings),

    /// Encoder step detected, before the menu interprets it.
    Rotated(Direction),

    /// Button press toggled edit mode.
    EditModeChanged(bool),

    /// Navigation moved to another screen.
    ScreenChanged(Screen),

    ThresholdChanged { which: Threshold, value: u8 },

    FanModeChanged { fan: FanId, mode: FanMode },

    PowerModeChanged(PowerMode),

    /// A fan output flipped.
    FanOutputChanged { fan: FanId, on: bool },
}
