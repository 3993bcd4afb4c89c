//! OLED display adapter.
//!
//! Lays out a [`View`] on a 128×64 monochrome target and implements
//! [`DisplayPort`] for the SSD1306 driver.
//!
//! ```text
//!  ┌───────────────────────────────┐ y=0
//!  │ Title                 [EDIT]  │
//!  ├───────────────────────────────┤ y=16
//!  │      72       │      78       │   measurement: current │ set point
//!  │               │               │   fan / power: centred mode word
//!  └───────────────────────────────┘ y=63
//! ```

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_hal::i2c::I2c;
use heapless::String;

use core::fmt::Write as _;

use crate::app::ports::DisplayPort;
use crate::drivers::oled::{FrameBuffer, OledDisplay};
use crate::error::DisplayError;
use crate::menu::{ScreenContent, View};
use crate::settings::FanId;

/// Height of the title band.
const SCREEN_TOP: i32 = 16;
const TITLE_POS: Point = Point::new(4, 4);
const FAN_TITLE_POS: Point = Point::new(16, 4);
const BADGE_MARGIN: i32 = 2;

/// Draw `view` onto `target`, which is assumed blank.
pub fn draw_view<D>(target: &mut D, view: &View) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let size = target.size();
    let width = size.width as i32;
    let height = size.height as i32;
    let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    // Title band and body frames.
    Rectangle::new(Point::zero(), Size::new(size.width - 1, SCREEN_TOP as u32))
        .into_styled(outline)
        .draw(target)?;
    Rectangle::new(
        Point::new(0, SCREEN_TOP + 1),
        Size::new(size.width - 1, (height - SCREEN_TOP - 1) as u32),
    )
    .into_styled(outline)
    .draw(target)?;

    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let title = view.title();
    let title_pos = match view.content {
        ScreenContent::Fan { fan, .. } => {
            draw_fan_glyph(target, fan)?;
            FAN_TITLE_POS
        }
        _ => TITLE_POS,
    };
    Text::with_baseline(title, title_pos, small, Baseline::Top).draw(target)?;

    if view.editing {
        draw_edit_badge(target, width)?;
    }

    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let centred = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let body_h = height - SCREEN_TOP - 1;
    let text_y = SCREEN_TOP + 1 + (body_h - large.font.character_size.height as i32) / 2;

    match view.content {
        ScreenContent::Measurement { current, set_point, .. } => {
            let half = width / 2;
            let mut left: String<12> = String::new();
            let _ = write!(left, "{}", current);
            let mut right: String<4> = String::new();
            let _ = write!(right, "{}", set_point);

            Text::with_text_style(&left, Point::new(half / 2, text_y), large, centred).draw(target)?;
            Line::new(Point::new(half, SCREEN_TOP + 1), Point::new(half, height - 1))
                .into_styled(outline)
                .draw(target)?;
            Text::with_text_style(&right, Point::new(half + half / 2, text_y), large, centred)
                .draw(target)?;
        }
        ScreenContent::Fan { mode, .. } => {
            Text::with_text_style(mode.label(), Point::new(width / 2, text_y), large, centred)
                .draw(target)?;
        }
        ScreenContent::Power { mode } => {
            Text::with_text_style(mode.label(), Point::new(width / 2, text_y), large, centred)
                .draw(target)?;
        }
    }
    Ok(())
}

/// 10×10 square with the quadrant of this fan punched out.
fn draw_fan_glyph<D>(target: &mut D, fan: FanId) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::new(3, 3), Size::new(10, 10))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;
    let hole = match fan {
        FanId::Fan1 => Point::new(4, 4),
        FanId::Fan2 => Point::new(8, 4),
        FanId::Fan3 => Point::new(4, 8),
        FanId::Fan4 => Point::new(8, 8),
    };
    Rectangle::new(hole, Size::new(4, 4))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target)
}

/// Inverted "EDIT" label in a rounded box, right side of the title band.
fn draw_edit_badge<D>(target: &mut D, width: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let font = &FONT_6X10;
    let badge_w = font.character_size.width as i32 * 4 + BADGE_MARGIN * 2;
    let badge_h = font.character_size.height as i32 + BADGE_MARGIN * 2;
    let x = width - badge_w - BADGE_MARGIN * 2;
    let y = (SCREEN_TOP - badge_h) / 2;

    RoundedRectangle::with_equal_corners(
        Rectangle::new(Point::new(x, y), Size::new(badge_w as u32, badge_h as u32)),
        Size::new(2, 2),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(target)?;

    let inverted = MonoTextStyle::new(font, BinaryColor::Off);
    Text::with_baseline(
        "EDIT",
        Point::new(x + BADGE_MARGIN, y + BADGE_MARGIN),
        inverted,
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

impl<I2C: I2c> DisplayPort for OledDisplay<I2C> {
    fn render(&mut self, view: &View) -> Result<(), DisplayError> {
        if !self.is_ready() {
            return Err(DisplayError::NotReady);
        }
        let mut next = FrameBuffer::new();
        // The frame buffer cannot fail.
        let Ok(()) = draw_view(&mut next, view);
        self.present(&next)
    }
}

/// A panel that failed to come up at boot is simply absent.
impl<D: DisplayPort> DisplayPort for Option<D> {
    fn render(&mut self, view: &View) -> Result<(), DisplayError> {
        match self {
            Some(display) => display.render(view),
            None => Ok(()),
        }
    }
}
