//! DHT11 single-wire temperature / humidity sensor.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the transfer runs through `dht_sensor` on an open-drain
//! [`PinDriver`] with the ROM busy-wait delay, inside an interrupt-free
//! section so no ISR can stretch a bit pulse.  The part needs ~1 s
//! between conversions, so one transfer is cached for
//! [`MIN_READ_INTERVAL_US`] and both the temperature and humidity reads
//! are served from it.  A failed transfer reads as NaN.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicU32, Ordering};

use log::warn;

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::Ets;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{AnyIOPin, InputOutput, PinDriver, Pull};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41B4_0000); // 22.5
static SIM_HUM_BITS: AtomicU32 = AtomicU32::new(0x4220_0000); // 40.0

/// Inject the next host-side reading.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(celsius: f32, humidity: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
    SIM_HUM_BITS.store(humidity.to_bits(), Ordering::Relaxed);
}

/// Minimum time between two bus transfers.
pub const MIN_READ_INTERVAL_US: i64 = 1_000_000;

#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    /// °C; NaN if the transfer failed.
    pub celsius: f32,
    /// %RH; NaN if the transfer failed.
    pub humidity: f32,
}

impl ClimateReading {
    pub const FAILED: Self = Self {
        celsius: f32::NAN,
        humidity: f32::NAN,
    };
}

// ---------------------------------------------------------------------------
// Transfer cache
// ---------------------------------------------------------------------------

/// Holds the last transfer result, success or failure, for one interval.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
#[derive(Debug, Default)]
struct ReadCache {
    last: Option<(i64, ClimateReading)>,
}

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
impl ReadCache {
    /// Serve the cached reading while it is younger than
    /// [`MIN_READ_INTERVAL_US`]; otherwise run `transfer` and cache it.
    fn get_or_read<F>(&mut self, now_us: i64, transfer: F) -> ClimateReading
    where
        F: FnOnce() -> Result<ClimateReading, SensorError>,
    {
        if let Some((at, reading)) = self.last {
            if now_us - at < MIN_READ_INTERVAL_US {
                return reading;
            }
        }

        let reading = transfer().unwrap_or_else(|e| {
            warn!("DHT11: {}", e);
            ClimateReading::FAILED
        });
        self.last = Some((now_us, reading));
        reading
    }
}

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

#[cfg(target_os = "espidf")]
pub struct ClimateSensor {
    pin: PinDriver<'static, AnyIOPin, InputOutput>,
    delay: Ets,
    cache: ReadCache,
}

#[cfg(target_os = "espidf")]
impl ClimateSensor {
    /// Claim the data line as open-drain with pull-up, idling high.
    pub fn new(pin: AnyIOPin) -> Result<Self, EspError> {
        let mut pin = PinDriver::input_output_od(pin)?;
        pin.set_pull(Pull::Up)?;
        pin.set_high()?;
        Ok(Self {
            pin,
            delay: Ets,
            cache: ReadCache::default(),
        })
    }

    pub fn read(&mut self) -> ClimateReading {
        // SAFETY: esp_timer_get_time reads a free-running counter.
        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        let Self { pin, delay, cache } = self;
        cache.get_or_read(now, || {
            pin.set_high().map_err(|_| SensorError::NoResponse)?;
            let reading = esp_idf_hal::interrupt::free(|| dht_sensor::dht11::blocking::read(delay, pin))
                .map_err(classify)?;
            Ok(ClimateReading {
                celsius: f32::from(reading.temperature),
                humidity: f32::from(reading.relative_humidity),
            })
        })
    }
}

#[cfg(target_os = "espidf")]
fn classify<E>(e: dht_sensor::DhtError<E>) -> SensorError {
    match e {
        dht_sensor::DhtError::ChecksumMismatch => SensorError::Checksum,
        dht_sensor::DhtError::Timeout => SensorError::Timeout,
        _ => SensorError::NoResponse,
    }
}

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct ClimateSensor;

#[cfg(not(target_os = "espidf"))]
impl ClimateSensor {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&mut self) -> ClimateReading {
        ClimateReading {
            celsius: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity: f32::from_bits(SIM_HUM_BITS.load(Ordering::Relaxed)),
        }
    }
}
