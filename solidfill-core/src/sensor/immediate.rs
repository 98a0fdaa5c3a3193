//! Synchronous acquisition variant

use super::{Quantity, Reading, SensorError};
use crate::traits::{ImmediateTransport, TransportError};

/// Sensor variant that completes a reading within one call
///
/// Temperature is read before pressure: transducers of this family use the
/// temperature conversion to compensate the following pressure readout.
pub struct ImmediateSensor<T> {
    transport: T,
}

impl<T: ImmediateTransport> ImmediateSensor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn init(&mut self) -> Result<(), TransportError> {
        self.transport.init()
    }

    /// Read both quantities
    pub fn read(&mut self) -> Result<Reading, SensorError> {
        let temperature = self
            .transport
            .read_temperature()
            .map_err(|e| SensorError::AcquisitionRead(Quantity::Temperature, e))?;
        let pressure = self
            .transport
            .read_pressure()
            .map_err(|e| SensorError::AcquisitionRead(Quantity::Pressure, e))?;

        Ok(Reading {
            temperature,
            pressure,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
