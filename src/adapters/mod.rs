//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                 |
//! |------------|---------------|-----------------------------|
//! | `display`  | DisplayPort   | SSD1306 OLED over I²C       |
//! | `hardware` | SensorPort    | DHT11, light ADC            |
//! |            | InputPort     | encoder GPIO                |
//! |            | ActuatorPort  | fan GPIO                    |
//! | `log_sink` | EventSink     | Serial log output           |
//! | `nvs`      | StoragePort   | NVS / in-memory byte image  |
//! | `time`     | ClockPort     | ESP32 system timer          |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
