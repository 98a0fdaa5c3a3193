//! Vacuum relay output trait

/// Relay that switches a vacuum pump or valve
///
/// Implementations hide the line polarity: `true` always means energized.
pub trait RelayOutput {
    /// Energize or release the relay
    fn set_energized(&mut self, energized: bool);

    /// Check if the relay is currently energized
    fn is_energized(&self) -> bool;
}
