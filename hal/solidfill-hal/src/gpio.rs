//! GPIO abstraction
//!
//! Outputs drive the vacuum relays; inputs read the encoder lines.

/// Digital output pin
///
/// Open-drain and push-pull pins both fit here; the electrical mode is
/// chosen when the chip HAL constructs the pin.
pub trait OutputPin {
    /// Drive the line high (released, for open-drain)
    fn set_high(&mut self);

    /// Drive the line low
    fn set_low(&mut self);

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the line reads high
    fn is_high(&self) -> bool;

    /// Check if the line reads low
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
