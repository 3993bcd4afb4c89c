//! Control primitives: sample averaging, fan decisions, and interval timing.
//!
//! Everything here is pure and hardware-agnostic.

pub mod fan;
pub mod sample_buffer;
pub mod timing;
