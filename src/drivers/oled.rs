//! SSD1306 128×64 monochrome OLED over I²C.
//!
//! All drawing targets a RAM [`FrameBuffer`] in the panel's native page
//! layout (8 pages of 128 column bytes, LSB = top row).  [`OledDisplay::flush`]
//! then streams the whole buffer in one data transfer.  Callers draw each
//! frame into a scratch buffer and hand it to [`OledDisplay::present`], which
//! only touches the bus when the frame differs from what the panel shows.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::error::DisplayError;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 64;
const PAGES: usize = HEIGHT as usize / 8;
const BUFFER_SIZE: usize = WIDTH as usize * PAGES;

/// Control byte: the rest of the transfer is commands.
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transfer is display RAM data.
const CONTROL_DATA: u8 = 0x40;

/// Power-on sequence for a 128×64 panel with internal charge pump.
const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide / oscillator
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4, // follow RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

// ---------------------------------------------------------------------------
// Frame buffer
// ---------------------------------------------------------------------------

/// 1 KiB page-format buffer implementing `DrawTarget<Color = BinaryColor>`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
        }
    }

    /// Whether the pixel at (x, y) is lit.  Out of range reads as off.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let idx = (y as usize / 8) * WIDTH as usize + x as usize;
        self.bytes[idx] & (1 << (y % 8)) != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let idx = (y / 8) * WIDTH as usize + x;
        let mask = 1u8 << (y % 8);
        if on {
            self.bytes[idx] |= mask;
        } else {
            self.bytes[idx] &= !mask;
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.set_pixel(x as usize, y as usize, color.is_on());
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

pub struct OledDisplay<I2C> {
    i2c: I2C,
    address: u8,
    /// What the panel RAM holds once `dirty` is clear.
    frame: FrameBuffer,
    dirty: bool,
    ready: bool,
}

impl<I2C: I2c> OledDisplay<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frame: FrameBuffer::new(),
            dirty: true,
            ready: false,
        }
    }

    /// Send the power-on sequence and blank the panel.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.command(INIT_SEQUENCE)?;
        self.ready = true;
        self.frame = FrameBuffer::new();
        self.dirty = true;
        self.flush()?;
        info!("OLED: SSD1306 at {:#04x} initialised", self.address);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Show `next`, skipping the bus when the panel already shows it.
    pub fn present(&mut self, next: &FrameBuffer) -> Result<(), DisplayError> {
        if self.frame != *next {
            self.frame.bytes.copy_from_slice(&next.bytes);
            self.dirty = true;
        }
        self.flush()
    }

    /// Push the frame buffer to the panel if it changed since the last flush.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotReady);
        }
        if !self.dirty {
            return Ok(());
        }

        // Full-screen window: columns 0..127, pages 0..7.
        self.command(&[0x21, 0x00, (WIDTH - 1) as u8, 0x22, 0x00, (PAGES - 1) as u8])?;

        let mut transfer = [0u8; BUFFER_SIZE + 1];
        transfer[0] = CONTROL_DATA;
        transfer[1..].copy_from_slice(&self.frame.bytes);
        self.i2c
            .write(self.address, &transfer)
            .map_err(|_| DisplayError::Bus)?;

        self.dirty = false;
        debug!("OLED: frame flushed");
        Ok(())
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut transfer = [0u8; 32];
        let len = bytes.len().min(transfer.len() - 1);
        transfer[0] = CONTROL_COMMAND;
        transfer[1..=len].copy_from_slice(&bytes[..len]);
        self.i2c
            .write(self.address, &transfer[..=len])
            .map_err(|_| DisplayError::Bus)
    }
}
