//! Sensor transport traits
//!
//! A transport is the device-specific half of a sensor: it talks to the
//! transducer and returns raw readings. The two families differ in timing,
//! so they get separate traits.

/// Errors reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Bus transaction failed (NACK, arbitration, timeout)
    Bus,
    /// Device did not acknowledge or never finished a conversion
    NotResponding,
    /// Device answered with an unexpected identifier
    BadChipId,
    /// Device returned data that cannot be compensated
    InvalidData,
}

/// Transducer that returns readings synchronously
///
/// Each read is a short bus transaction that completes within the call.
pub trait ImmediateTransport {
    /// Establish communication and configure the device
    fn init(&mut self) -> Result<(), TransportError>;

    /// Read the current temperature (°C)
    fn read_temperature(&mut self) -> Result<f32, TransportError>;

    /// Read the current raw pressure
    fn read_pressure(&mut self) -> Result<f32, TransportError>;
}

/// Transducer that needs a conversion delay between command and result
///
/// `start_*` calls return the conversion time in milliseconds that must
/// elapse before the matching `get_*` call.
pub trait PhasedTransport {
    /// Establish communication and load calibration
    fn init(&mut self) -> Result<(), TransportError>;

    /// Start a temperature conversion, returning the wait in ms
    ///
    /// A wait of zero means the device refused the conversion.
    fn start_temperature(&mut self) -> Result<u8, TransportError>;

    /// Retrieve the finished temperature conversion (°C)
    fn get_temperature(&mut self) -> Result<f32, TransportError>;

    /// Start a pressure conversion, returning the wait in ms
    ///
    /// A wait of zero means the device refused the conversion.
    fn start_pressure(&mut self, oversampling: u8) -> Result<u8, TransportError>;

    /// Retrieve the pressure conversion, compensated with `temperature`
    ///
    /// Waits internally if the conversion is still running.
    fn get_pressure(&mut self, temperature: f32) -> Result<f32, TransportError>;
}
