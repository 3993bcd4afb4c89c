//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] as a small byte-addressed store on top of
//! the ESP-IDF key/value flash, so the settings layout can keep EEPROM
//! semantics:
//!
//! - every byte address maps to its own `u8` key (`b10`, `b11`, ...),
//! - the format marker is a `u16` key,
//! - a key that was never written reads as erased (`0xFF` / `0xFFFF`),
//! - each write is committed before returning (atomic per field).
//!
//! The simulation backend is a plain erased RAM image.

use core::fmt::Write as _;

use heapless::String;
use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::StoragePort;
use crate::error::StorageError;

/// Addressable bytes.
pub const CAPACITY: u16 = 64;
/// What an erased cell reads as.
pub const ERASED: u8 = 0xFF;

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const NAMESPACE: &str = "ventctl";
const MARKER_KEY: &str = "marker";

/// NUL-terminated NVS key for a byte address.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn byte_key(addr: u16) -> String<8> {
    let mut key = String::new();
    // "b" + at most 5 digits + NUL always fits.
    let _ = write!(key, "b{}\0", addr);
    key
}

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    image: [u8; CAPACITY as usize],
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::Unavailable);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::Unavailable);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::Unavailable);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self::default())
    }

    fn check(addr: u16) -> Result<(), StorageError> {
        if addr < CAPACITY {
            Ok(())
        } else {
            Err(StorageError::OutOfBounds(addr))
        }
    }

    /// Open the namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = NAMESPACE.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret == ESP_ERR_NVS_NOT_FOUND as i32 && !write {
            // Namespace not created yet: nothing was ever written.
            return Err(StorageError::Unavailable);
        }
        if ret != ESP_OK {
            return Err(StorageError::Io);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result.map_err(|_| StorageError::Io)
    }
}

impl Default for NvsAdapter {
    /// A backend with nothing written; reads return erased cells.
    fn default() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            image: [ERASED; CAPACITY as usize],
        }
    }
}

impl StoragePort for NvsAdapter {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError> {
        Self::check(addr)?;

        #[cfg(not(target_os = "espidf"))]
        {
            Ok(self.image[addr as usize])
        }

        #[cfg(target_os = "espidf")]
        {
            let key = byte_key(addr);
            let result = Self::with_nvs_handle(false, |handle| {
                let mut value: u8 = ERASED;
                let ret = unsafe { nvs_get_u8(handle, key.as_ptr() as *const _, &mut value) };
                if ret == ESP_ERR_NVS_NOT_FOUND as i32 {
                    return Ok(ERASED);
                }
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(value)
            });
            match result {
                Err(StorageError::Unavailable) => Ok(ERASED),
                other => other,
            }
        }
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        Self::check(addr)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.image[addr as usize] = value;
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = byte_key(addr);
            Self::with_nvs_handle(true, |handle| {
                let ret = unsafe { nvs_set_u8(handle, key.as_ptr() as *const _, value) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
        }
    }

    fn read_marker(&self) -> Result<u16, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            Ok(u16::from_le_bytes([self.image[0], self.image[1]]))
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(false, |handle| {
                let mut value: u16 = u16::MAX;
                let ret = unsafe {
                    nvs_get_u16(handle, marker_key().as_ptr() as *const _, &mut value)
                };
                if ret == ESP_ERR_NVS_NOT_FOUND as i32 {
                    return Ok(u16::MAX);
                }
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(value)
            });
            match result {
                Err(StorageError::Unavailable) => Ok(u16::MAX),
                other => other,
            }
        }
    }

    fn write_marker(&mut self, marker: u16) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.image[..2].copy_from_slice(&marker.to_le_bytes());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(true, |handle| {
                let ret = unsafe { nvs_set_u16(handle, marker_key().as_ptr() as *const _, marker) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
        }
    }
}

/// NUL-terminated marker key.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn marker_key() -> String<8> {
    let mut key = String::new();
    let _ = write!(key, "{}\0", MARKER_KEY);
    key
}
