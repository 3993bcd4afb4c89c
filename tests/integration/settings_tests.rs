//! Settings persistence against a recording byte store.

use ventctl::adapters::nvs::NvsAdapter;
use ventctl::settings::store::{FAN_ADDRS, FORMAT_MARKER, POWER_ADDR, SettingsStore};
use ventctl::settings::{FanId, FanMode, PowerMode, Settings, Threshold};

use crate::mock_hw::{MockStorage, StorageWrite};

#[test]
fn first_boot_writes_every_field_then_marker() {
    let store = SettingsStore::open(MockStorage::erased());
    assert_eq!(*store.settings(), Settings::default());

    let writes = &store.storage().writes;
    assert_eq!(writes.len(), 9);
    assert_eq!(writes[0], StorageWrite::Byte { addr: 10, value: 78 });
    assert_eq!(writes[7], StorageWrite::Byte { addr: POWER_ADDR, value: 1 });
    assert_eq!(writes[8], StorageWrite::Marker(FORMAT_MARKER));
}

#[test]
fn second_boot_reads_without_writing() {
    let mut store = SettingsStore::open(MockStorage::erased());
    store.write_threshold(Threshold::Humidity, 60).unwrap();
    store.write_power_mode(PowerMode::SolarGated).unwrap();

    let mut storage = store.into_storage();
    storage.writes.clear();
    let store = SettingsStore::open(storage);

    assert_eq!(store.settings().humidity_threshold, 60);
    assert_eq!(store.settings().power_mode, PowerMode::SolarGated);
    assert!(store.storage().writes.is_empty());
}

#[test]
fn interrupted_first_boot_is_redone() {
    // Power lost after the fields but before the marker.
    let mut storage = MockStorage::erased();
    storage.bytes[10] = 5;
    let store = SettingsStore::open(storage);
    assert_eq!(store.settings().temperature_threshold, 78);
    assert_eq!(store.storage().writes.last(), Some(&StorageWrite::Marker(FORMAT_MARKER)));
}

#[test]
fn out_of_range_bytes_are_clamped() {
    let mut storage = MockStorage::erased();
    storage.bytes[..2].copy_from_slice(&FORMAT_MARKER.to_le_bytes());
    storage.bytes[10] = 200;
    storage.bytes[11] = 40;
    storage.bytes[12] = 0;
    storage.bytes[FAN_ADDRS[2] as usize] = 7;
    storage.bytes[POWER_ADDR as usize] = 0xFF;

    let store = SettingsStore::open(storage);
    let s = store.settings();
    assert_eq!(s.temperature_threshold, 99);
    assert_eq!(s.humidity_threshold, 40);
    assert_eq!(s.light_threshold, 0);
    assert_eq!(s.fan_mode(FanId::Fan3), FanMode::Auto);
    assert_eq!(s.power_mode, PowerMode::SolarGated);
}

#[test]
fn unreadable_store_runs_on_defaults() {
    let mut storage = MockStorage::erased();
    storage.fail_reads = true;
    let store = SettingsStore::open(storage);
    assert_eq!(*store.settings(), Settings::default());
}

#[test]
fn nvs_simulation_keeps_edits_across_reopen() {
    let mut store = SettingsStore::open(NvsAdapter::default());
    store.write_fan_mode(FanId::Fan2, FanMode::Off).unwrap();
    store.write_threshold(Threshold::Light, 12).unwrap();

    let store = SettingsStore::open(store.into_storage());
    assert_eq!(store.settings().fan_mode(FanId::Fan2), FanMode::Off);
    assert_eq!(store.settings().light_threshold, 12);
}
