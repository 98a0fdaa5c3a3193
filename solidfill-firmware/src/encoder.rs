//! Rotary encoder sampling
//!
//! Polls both phases and feeds changes through the quadrature decoder.

use embassy_time::{Duration, Timer};
use solidfill_core::input::{QuadratureDecoder, Step};
use solidfill_hal::InputPin;

/// Delay between samples
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Quadrature encoder on two input pins
pub struct Encoder<A, B> {
    a: A,
    b: B,
    decoder: QuadratureDecoder,
}

impl<A: InputPin, B: InputPin> Encoder<A, B> {
    pub fn new(a: A, b: B) -> Self {
        let decoder = QuadratureDecoder::new(a.is_high(), b.is_high());
        Self { a, b, decoder }
    }

    /// Wait one sample period, then decode
    ///
    /// Returns a step once a full detent has been seen.
    pub async fn poll(&mut self) -> Option<Step> {
        Timer::after(POLL_INTERVAL).await;
        self.decoder.update(self.a.is_high(), self.b.is_high())
    }
}
