//! Fuzz target: settings load and menu edits over arbitrary storage
//!
//! Fills the byte store from the input, opens it, then replays the rest
//! of the input as encoder steps and button presses.  Checks:
//! - No panics for any stored image
//! - Thresholds never exceed 99 after load or after an edit
//! - Every edit that reports a change is what the store now holds
//!
//! cargo fuzz run fuzz_settings_load

#![no_main]

use libfuzzer_sys::fuzz_target;
use ventctl::app::ports::StoragePort;
use ventctl::drivers::encoder::Direction;
use ventctl::error::StorageError;
use ventctl::menu::{Menu, MenuChange};
use ventctl::settings::store::{SettingsStore, threshold_addr};
use ventctl::settings::{THRESHOLD_MAX, Threshold};

const IMAGE: usize = 32;

struct MemStore {
    bytes: [u8; IMAGE],
}

impl StoragePort for MemStore {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::OutOfBounds(addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(StorageError::OutOfBounds(addr))?;
        *slot = value;
        Ok(())
    }

    fn read_marker(&self) -> Result<u16, StorageError> {
        Ok(u16::from_le_bytes([self.bytes[0], self.bytes[1]]))
    }

    fn write_marker(&mut self, marker: u16) -> Result<(), StorageError> {
        self.bytes[..2].copy_from_slice(&marker.to_le_bytes());
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let (image, ops) = data.split_at(data.len().min(IMAGE));
    let mut bytes = [0xFF; IMAGE];
    bytes[..image.len()].copy_from_slice(image);

    let mut store = SettingsStore::open(MemStore { bytes });
    for which in [Threshold::Temperature, Threshold::Humidity, Threshold::Light] {
        assert!(store.settings().threshold(which) <= THRESHOLD_MAX);
    }

    let mut menu = Menu::new();
    for op in ops {
        let change = match op % 3 {
            0 => menu.toggle_edit(),
            1 => menu.rotate(Direction::Clockwise, &mut store).unwrap_or(MenuChange::Unchanged),
            _ => menu
                .rotate(Direction::CounterClockwise, &mut store)
                .unwrap_or(MenuChange::Unchanged),
        };
        if let MenuChange::Threshold { which, value } = change {
            assert!(value <= THRESHOLD_MAX);
            assert_eq!(store.storage().read_byte(threshold_addr(which)), Ok(value));
        }
    }
});
