//! OLED display drivers
//!
//! [`Ssd1306`] owns the frame buffer and speaks to the panel;
//! [`OledDisplay`] draws the controller UI onto any [`Panel`] through
//! embedded-graphics.

pub mod graphics;
pub mod ssd1306;

pub use graphics::OledDisplay;
pub use ssd1306::Ssd1306;

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions};
use solidfill_core::traits::DisplayError;

/// Frame-buffered monochrome panel
pub trait Panel: DrawTarget<Color = BinaryColor, Error = Infallible> + OriginDimensions {
    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}
