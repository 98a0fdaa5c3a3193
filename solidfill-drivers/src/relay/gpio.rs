//! GPIO relay output
//!
//! Relay modules on the vacuum lines are driven through an open-drain pin
//! and energize when the line is pulled low.

use solidfill_core::traits::RelayOutput;
use solidfill_hal::OutputPin;

/// Relay on a single GPIO line
pub struct GpioRelay<P> {
    pin: P,
    /// If true, energized = pin LOW
    inverted: bool,
    energized: bool,
}

impl<P: OutputPin> GpioRelay<P> {
    /// Create a relay and release it
    ///
    /// - `inverted`: energize by driving the pin low
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            energized: false,
        };
        relay.set_energized(false);
        relay
    }

    /// Relay that energizes on a low line (the usual relay module)
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Relay that energizes on a high line
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> RelayOutput for GpioRelay<P> {
    fn set_energized(&mut self, energized: bool) {
        self.energized = energized;

        if energized != self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}
