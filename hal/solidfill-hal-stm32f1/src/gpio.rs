//! GPIO pins for STM32F1
//!
//! Relay lines are open-drain so the relay board's pull-up defines the
//! released state; encoder lines are plain pulled-up inputs.

use embassy_stm32::gpio::{Input, OutputOpenDrain};
use solidfill_hal::{InputPin, OutputPin};

/// Open-drain output driving one relay module input
pub struct RelayPin<'d> {
    pin: OutputOpenDrain<'d>,
}

impl<'d> RelayPin<'d> {
    pub fn new(pin: OutputOpenDrain<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for RelayPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Encoder phase input
pub struct EncoderPin<'d> {
    pin: Input<'d>,
}

impl<'d> EncoderPin<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl InputPin for EncoderPin<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
