//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control loop of the ventilation controller:
//! input handling, sensor filtering, menu orchestration and fan
//! actuation.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
