//! Display driver trait for the status OLED
//!
//! The driver owns a frame buffer: drawing calls only touch the buffer and
//! [`DisplayDriver::flush`] pushes the whole frame to the panel.

use core::fmt::Write;

use heapless::String;

/// Monochrome pixel color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
}

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction to the panel failed
    Communication,
    /// Panel has not been initialized
    NotInitialized,
}

/// Trait for frame-buffered monochrome displays
///
/// Coordinates are in pixels with the origin at the top-left corner.
/// Text is drawn at the cursor with its top edge on the cursor row, and the
/// cursor advances by one glyph width per character.
pub trait DisplayDriver {
    /// Clear the frame buffer
    fn clear(&mut self);

    /// Draw a one pixel line between two points (inclusive)
    fn line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, color: Color);

    /// Draw a rectangle outline
    fn rect(&mut self, x: u8, y: u8, width: u8, height: u8, color: Color);

    /// Draw a rectangle outline with rounded corners
    fn rounded_rect(&mut self, x: u8, y: u8, width: u8, height: u8, radius: u8, color: Color);

    /// Move the text cursor
    fn set_cursor(&mut self, x: u8, y: u8);

    /// Set the integer text scale (1 = 6x10 glyph cell, 6 px advance)
    fn set_text_size(&mut self, size: u8);

    /// Set the text color, with an optional opaque background
    ///
    /// With `background == None` the text is drawn transparently.
    fn set_text_color(&mut self, foreground: Color, background: Option<Color>);

    /// Print text at the cursor and advance it
    fn print(&mut self, text: &str);

    /// Send the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Panel width in pixels
    fn width(&self) -> u8;

    /// Panel height in pixels
    fn height(&self) -> u8;

    /// Horizontal advance of one character at the given text size
    fn glyph_width(&self, size: u8) -> u8 {
        6u8.saturating_mul(size.max(1))
    }
}

/// Helper trait for drawing common UI elements
pub trait DisplayExt: DisplayDriver {
    /// Print a number with two decimals
    fn print_value(&mut self, value: f32) {
        let mut buf: String<16> = String::new();
        // Values beyond the buffer only occur for runaway targets; drop them
        if write!(buf, "{:.2}", value).is_ok() {
            self.print(&buf);
        }
    }

    /// Print an unsigned integer
    fn print_number(&mut self, value: u32) {
        let mut buf: String<10> = String::new();
        if write!(buf, "{}", value).is_ok() {
            self.print(&buf);
        }
    }

    /// Print text horizontally centered on row `y`
    fn print_centered(&mut self, text: &str, size: u8, y: u8) {
        let text_width = (text.chars().count() as u32) * u32::from(self.glyph_width(size));
        let x = (u32::from(self.width()).saturating_sub(text_width) / 2) as u8;
        self.set_text_size(size);
        self.set_cursor(x, y);
        self.print(text);
    }
}

// Blanket implementation for all DisplayDriver types
impl<T: DisplayDriver> DisplayExt for T {}
