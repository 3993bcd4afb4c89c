//! ventctl firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink   NvsAdapter   Esp32Time│
//! │  (Sensor+Input+Actuator)  (EventSink)    (Storage)    (Clock)  │
//! │  OledDisplay (Display)                                         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  Menu · SettingsStore · Filters · Fan decisions        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver, I2C0};
use esp_idf_hal::gpio::{AnyIOPin, IOPin};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use ventctl::adapters::hardware::{EncoderPins, HardwareAdapter};
use ventctl::adapters::log_sink::LogEventSink;
use ventctl::adapters::nvs::NvsAdapter;
use ventctl::adapters::time::Esp32TimeAdapter;
use ventctl::app::service::Controller;
use ventctl::config::ControllerConfig;
use ventctl::drivers::fans::FanBank;
use ventctl::drivers::hw_init;
use ventctl::drivers::oled::OledDisplay;
use ventctl::error::Error;
use ventctl::pins;
use ventctl::sensors::SensorHub;
use ventctl::sensors::climate::ClimateSensor;
use ventctl::sensors::light::LightSensor;
use ventctl::settings::store::SettingsStore;

/// One FreeRTOS tick at the default 100 Hz rate; lets the idle task feed
/// the task watchdog.
const YIELD_MS: u32 = 10;

/// Bring up the OLED on I2C0.
fn open_display(
    i2c: I2C0,
    sda: AnyIOPin,
    scl: AnyIOPin,
) -> ventctl::error::Result<OledDisplay<I2cDriver<'static>>> {
    let config = I2cConfig::new().baudrate(Hertz(pins::OLED_I2C_FREQ_HZ));
    let driver = I2cDriver::new(i2c, sda, scl, &config).map_err(|_| Error::Init("I2C0 driver"))?;
    let mut oled = OledDisplay::new(driver, pins::OLED_I2C_ADDR);
    oled.init()?;
    Ok(oled)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ventctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without GPIO the fans cannot be driven safely; halt and let
        // the task watchdog reset the chip.
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = Peripherals::take()?;
    let mut display = match open_display(
        peripherals.i2c0,
        peripherals.pins.gpio14.downgrade(),
        peripherals.pins.gpio15.downgrade(),
    ) {
        Ok(oled) => Some(oled),
        Err(e) => {
            warn!("Display unavailable ({}), running headless", e);
            None
        }
    };

    // ── 3. Load settings from NVS (or defaults) ───────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            NvsAdapter::default()
        }
    };
    let store = SettingsStore::open(nvs);

    // ── 4. Construct adapters ─────────────────────────────────
    let climate = ClimateSensor::new(peripherals.pins.gpio7.downgrade())?;
    let sensor_hub = SensorHub::new(climate, LightSensor::new());
    let mut hw = HardwareAdapter::new(sensor_hub, FanBank::new(), EncoderPins::default());
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 5. Start the controller ───────────────────────────────
    let mut controller = Controller::start(
        ControllerConfig::default(),
        store,
        &mut hw,
        &clock,
        &mut log_sink,
    );

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        controller.tick(&mut hw, &mut display, &clock, &mut log_sink);
        FreeRtos::delay_ms(YIELD_MS);
    }
}
