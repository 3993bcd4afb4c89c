//! GPIO / peripheral pin assignments for the ventctl main board.
//!
//! Raw-GPIO drivers (encoder, fans, light ADC) read their numbers from
//! here.  Pins owned through `esp-idf-hal` drivers are claimed by name from
//! `Peripherals` in `main.rs`:
//!
//! | Signal      | GPIO |
//! |-------------|------|
//! | DHT11 data  | 7    |
//! | OLED SDA    | 14   |
//! | OLED SCL    | 15   |

// ---------------------------------------------------------------------------
// Rotary encoder (KY-040 style, CLK/DT quadrature + push switch)
// ---------------------------------------------------------------------------

/// Quadrature data phase (DT).
pub const ENC_DT_GPIO: i32 = 2;
/// Quadrature clock phase (CLK).  Edges on this pin drive the decoder.
pub const ENC_CLK_GPIO: i32 = 3;
/// Encoder push switch, active-low with internal pull-up.
pub const ENC_SW_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Photoresistor divider for solar light level: ADC1 channel 0, which is
/// GPIO 1 on the ESP32-S3.
pub const LIGHT_ADC1_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Fan outputs (logic-level MOSFET gates, active HIGH)
// ---------------------------------------------------------------------------

pub const FAN1_GPIO: i32 = 5;
pub const FAN2_GPIO: i32 = 10;
pub const FAN3_GPIO: i32 = 6;
pub const FAN4_GPIO: i32 = 9;

/// Fan outputs indexed by [`FanId::index`](crate::settings::FanId::index).
pub const FAN_GPIOS: [i32; 4] = [FAN1_GPIO, FAN2_GPIO, FAN3_GPIO, FAN4_GPIO];

// ---------------------------------------------------------------------------
// OLED (SSD1306 128x64 on I²C)
// ---------------------------------------------------------------------------

/// 7-bit I²C address of the SSD1306 panel.
pub const OLED_I2C_ADDR: u8 = 0x3C;
/// I²C bus clock for the panel.
pub const OLED_I2C_FREQ_HZ: u32 = 400_000;
