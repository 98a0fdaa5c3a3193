//! embedded-graphics adapter for the controller UI
//!
//! Implements the core display surface on top of a [`Panel`]. Text uses
//! the 6x10 mono font; larger text sizes scale every glyph pixel into a
//! `size` x `size` block, keeping the 6 px per size unit advance the
//! layouts are built on.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};
use solidfill_core::traits::{Color, DisplayDriver, DisplayError};

use super::Panel;

fn binary(color: Color) -> BinaryColor {
    match color {
        Color::White => BinaryColor::On,
        Color::Black => BinaryColor::Off,
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Draw target that blows every pixel up around a fixed origin
struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<T: Panel> OriginDimensions for Scaled<'_, T> {
    fn size(&self) -> Size {
        self.target.size()
    }
}

impl<T: Panel> DrawTarget for Scaled<'_, T> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let offset = point - self.origin;
            let top_left = self.origin + offset * self.scale as i32;
            let block = Rectangle::new(top_left, Size::new_equal(self.scale));
            self.target.fill_solid(&block, color)?;
        }
        Ok(())
    }
}

/// Controller display on an embedded-graphics panel
pub struct OledDisplay<P> {
    panel: P,
    cursor: Point,
    text_size: u8,
    foreground: BinaryColor,
    background: Option<BinaryColor>,
}

impl<P: Panel> OledDisplay<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            cursor: Point::zero(),
            text_size: 1,
            foreground: BinaryColor::On,
            background: None,
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Current text cursor
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor.x, self.cursor.y)
    }

    fn text_style(&self) -> MonoTextStyle<'static, BinaryColor> {
        let builder = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(self.foreground);
        match self.background {
            Some(bg) => builder.background_color(bg).build(),
            None => builder.build(),
        }
    }
}

impl<P: Panel> DisplayDriver for OledDisplay<P> {
    fn clear(&mut self) {
        infallible(self.panel.clear(BinaryColor::Off));
    }

    fn line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, color: Color) {
        let line = Line::new(
            Point::new(i32::from(x0), i32::from(y0)),
            Point::new(i32::from(x1), i32::from(y1)),
        );
        infallible(
            line.into_styled(PrimitiveStyle::with_stroke(binary(color), 1))
                .draw(&mut self.panel),
        );
    }

    fn rect(&mut self, x: u8, y: u8, width: u8, height: u8, color: Color) {
        let rect = Rectangle::new(
            Point::new(i32::from(x), i32::from(y)),
            Size::new(u32::from(width), u32::from(height)),
        );
        infallible(
            rect.into_styled(PrimitiveStyle::with_stroke(binary(color), 1))
                .draw(&mut self.panel),
        );
    }

    fn rounded_rect(&mut self, x: u8, y: u8, width: u8, height: u8, radius: u8, color: Color) {
        let rect = RoundedRectangle::with_equal_corners(
            Rectangle::new(
                Point::new(i32::from(x), i32::from(y)),
                Size::new(u32::from(width), u32::from(height)),
            ),
            Size::new_equal(u32::from(radius)),
        );
        infallible(
            rect.into_styled(PrimitiveStyle::with_stroke(binary(color), 1))
                .draw(&mut self.panel),
        );
    }

    fn set_cursor(&mut self, x: u8, y: u8) {
        self.cursor = Point::new(i32::from(x), i32::from(y));
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size.max(1);
    }

    fn set_text_color(&mut self, foreground: Color, background: Option<Color>) {
        self.foreground = binary(foreground);
        self.background = background.map(binary);
    }

    fn print(&mut self, text: &str) {
        let style = self.text_style();
        let scale = u32::from(self.text_size);
        let origin = self.cursor;
        let mut target = Scaled {
            target: &mut self.panel,
            origin,
            scale,
        };
        infallible(Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut target));

        let advance = text.chars().count() as i32 * i32::from(self.glyph_width(self.text_size));
        self.cursor.x += advance;
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.panel.flush()
    }

    fn width(&self) -> u8 {
        self.panel.size().width.min(u32::from(u8::MAX)) as u8
    }

    fn height(&self) -> u8 {
        self.panel.size().height.min(u32::from(u8::MAX)) as u8
    }
}
