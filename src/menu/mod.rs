//! Menu state machine.
//!
//! ```text
//!          press                         press
//!  ┌──────────────┐  toggles   ┌──────────────────────┐
//!  │  Navigating  │ ◀────────▶ │       Editing        │
//!  │ CW  → next   │            │ threshold ±1 (1..99) │
//!  │ CCW → prev   │            │ mode forward/back    │
//!  └──────────────┘            └──────────────────────┘
//! ```
//!
//! Screens form a closed cycle that wraps in both directions.  Edits are
//! written through to the [`SettingsStore`] as they happen; the returned
//! [`MenuChange`] tells the caller what moved.

use crate::app::ports::StoragePort;
use crate::control::fan::Readings;
use crate::drivers::encoder::Direction;
use crate::error::StorageError;
use crate::settings::store::SettingsStore;
use crate::settings::{FanId, FanMode, PowerMode, Settings, THRESHOLD_MAX, THRESHOLD_MIN, Threshold};

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Screen {
    Temperature = 0,
    Humidity = 1,
    Light = 2,
    Fan1 = 3,
    Fan2 = 4,
    Fan3 = 5,
    Fan4 = 6,
    Power = 7,
}

/// What a screen shows and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Threshold(Threshold),
    Fan(FanId),
    Power,
}

impl Screen {
    pub const COUNT: usize = 8;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Temperature,
        Self::Humidity,
        Self::Light,
        Self::Fan1,
        Self::Fan2,
        Self::Fan3,
        Self::Fan4,
        Self::Power,
    ];

    fn from_index(idx: usize) -> Self {
        Self::ALL[idx % Self::COUNT]
    }

    pub fn next(self) -> Self {
        Self::from_index(self as usize + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self as usize + Self::COUNT - 1)
    }

    pub const fn binding(self) -> Binding {
        match self {
            Self::Temperature => Binding::Threshold(Threshold::Temperature),
            Self::Humidity => Binding::Threshold(Threshold::Humidity),
            Self::Light => Binding::Threshold(Threshold::Light),
            Self::Fan1 => Binding::Fan(FanId::Fan1),
            Self::Fan2 => Binding::Fan(FanId::Fan2),
            Self::Fan3 => Binding::Fan(FanId::Fan3),
            Self::Fan4 => Binding::Fan(FanId::Fan4),
            Self::Power => Binding::Power,
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Outcome of one menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChange {
    EditMode(bool),
    Screen(Screen),
    Threshold { which: Threshold, value: u8 },
    FanMode { fan: FanId, mode: FanMode },
    PowerMode(PowerMode),
    /// Saturated edit; nothing changed and nothing was written.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Menu {
    screen: Screen,
    editing: bool,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub const fn new() -> Self {
        Self {
            screen: Screen::Temperature,
            editing: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Button press: flip edit mode, screen unchanged.
    pub fn toggle_edit(&mut self) -> MenuChange {
        self.editing = !self.editing;
        MenuChange::EditMode(self.editing)
    }

    /// Encoder step.  Navigates when idle, edits (and persists) when editing.
    ///
    /// On a storage error the in-memory setting still holds the new value.
    pub fn rotate<S: StoragePort>(
        &mut self,
        dir: Direction,
        store: &mut SettingsStore<S>,
    ) -> Result<MenuChange, StorageError> {
        if !self.editing {
            self.screen = match dir {
                Direction::Clockwise => self.screen.next(),
                Direction::CounterClockwise => self.screen.prev(),
            };
            return Ok(MenuChange::Screen(self.screen));
        }

        match self.screen.binding() {
            Binding::Threshold(which) => {
                let current = store.settings().threshold(which);
                let value = step_threshold(current, dir);
                if value == current {
                    return Ok(MenuChange::Unchanged);
                }
                store.write_threshold(which, value)?;
                Ok(MenuChange::Threshold { which, value })
            }
            Binding::Fan(fan) => {
                let current = store.settings().fan_mode(fan);
                let mode = match dir {
                    Direction::Clockwise => current.forward(),
                    Direction::CounterClockwise => current.backward(),
                };
                store.write_fan_mode(fan, mode)?;
                Ok(MenuChange::FanMode { fan, mode })
            }
            Binding::Power => {
                let current = store.settings().power_mode;
                let mode = match dir {
                    Direction::Clockwise => current.forward(),
                    Direction::CounterClockwise => current.backward(),
                };
                store.write_power_mode(mode)?;
                Ok(MenuChange::PowerMode(mode))
            }
        }
    }

    /// Semantic content of the current screen.
    pub fn view(&self, settings: &Settings, readings: &Readings) -> View {
        let content = match self.screen.binding() {
            Binding::Threshold(which) => ScreenContent::Measurement {
                which,
                current: match which {
                    Threshold::Temperature => readings.temperature,
                    Threshold::Humidity => readings.humidity,
                    Threshold::Light => readings.light,
                },
                set_point: settings.threshold(which),
            },
            Binding::Fan(fan) => ScreenContent::Fan {
                fan,
                mode: settings.fan_mode(fan),
            },
            Binding::Power => ScreenContent::Power {
                mode: settings.power_mode,
            },
        };
        View {
            content,
            editing: self.editing,
        }
    }
}

/// +1 / -1 saturating at the threshold bounds.  A value below the minimum
/// (only possible from storage) snaps up to the minimum on a CCW step.
fn step_threshold(value: u8, dir: Direction) -> u8 {
    match dir {
        Direction::Clockwise => {
            if value >= THRESHOLD_MAX {
                THRESHOLD_MAX
            } else {
                value + 1
            }
        }
        Direction::CounterClockwise => {
            if value <= THRESHOLD_MIN {
                THRESHOLD_MIN
            } else {
                value - 1
            }
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenContent {
    Measurement {
        which: Threshold,
        current: i32,
        set_point: u8,
    },
    Fan {
        fan: FanId,
        mode: FanMode,
    },
    Power {
        mode: PowerMode,
    },
}

/// What the display should show; layout belongs to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub content: ScreenContent,
    /// Show the EDIT badge.
    pub editing: bool,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self.content {
            ScreenContent::Measurement { which, .. } => match which {
                Threshold::Temperature => "Temperature",
                Threshold::Humidity => "Humidity",
                Threshold::Light => "Solar",
            },
            ScreenContent::Fan { fan, .. } => fan.label(),
            ScreenContent::Power { .. } => "Power",
        }
    }
}
