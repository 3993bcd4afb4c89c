//! Controller timing parameters
//!
//! Static tuning for the control loop.  User-editable values (thresholds,
//! fan and power modes) live in [`crate::settings`] and are persisted;
//! these are compiled in.

/// Core controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Push-button settle time (milliseconds)
    pub debounce_ms: u32,
    /// Temperature/humidity refresh interval (microseconds)
    pub climate_interval_us: u32,
    /// Light sensor refresh interval (microseconds)
    pub light_interval_us: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            climate_interval_us: 500_000, // 2 Hz
            light_interval_us: 500_000,   // 2 Hz
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = ControllerConfig::default();
        assert_eq!(c.debounce_ms, 50);
        assert!(c.climate_interval_us > 0);
        assert!(c.light_interval_us > 0);
    }

    #[test]
    fn sensor_intervals_slower_than_debounce() {
        let c = ControllerConfig::default();
        assert!(
            c.climate_interval_us / 1000 > c.debounce_ms,
            "sensor refresh must not starve button handling"
        );
        assert!(c.light_interval_us / 1000 > c.debounce_ms);
    }
}
