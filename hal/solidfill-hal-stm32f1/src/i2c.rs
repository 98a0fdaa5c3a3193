//! I2C bus for STM32F1
//!
//! [`BlockingI2c`] owns a whole peripheral. [`SharedI2c`] hands out one
//! device handle per driver when several chips sit on the same bus.

use core::cell::RefCell;

use embassy_stm32::i2c::{Error as I2cError, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use solidfill_hal::I2cBus;

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Timeout
    Timeout,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<I2cError> for I2cBusError {
    fn from(e: I2cError) -> Self {
        match e {
            I2cError::Bus => I2cBusError::Bus,
            I2cError::Arbitration => I2cBusError::ArbitrationLost,
            I2cError::Nack => I2cBusError::Nack,
            I2cError::Timeout => I2cBusError::Timeout,
            I2cError::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

/// Blocking I2C master
pub struct BlockingI2c<'d> {
    i2c: I2c<'d, Blocking, Master>,
}

impl<'d> BlockingI2c<'d> {
    pub fn new(i2c: I2c<'d, Blocking, Master>) -> Self {
        Self { i2c }
    }
}

impl I2cBus for BlockingI2c<'_> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        Ok(self.i2c.blocking_write(address, data)?)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        Ok(self.i2c.blocking_read(address, buf)?)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        Ok(self.i2c.blocking_write_read(address, write_data, read_buf)?)
    }
}

/// Bus shared between drivers
pub type SharedBus<B> = Mutex<CriticalSectionRawMutex, RefCell<B>>;

/// One driver's handle onto a [`SharedBus`]
///
/// Each transaction runs inside the bus lock, so transactions from
/// different handles never interleave.
pub struct SharedI2c<'a, B> {
    bus: &'a SharedBus<B>,
}

impl<'a, B: I2cBus> SharedI2c<'a, B> {
    pub fn new(bus: &'a SharedBus<B>) -> Self {
        Self { bus }
    }
}

impl<B: I2cBus> I2cBus for SharedI2c<'_, B> {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.bus
            .lock(|bus| bus.borrow_mut().write(address, data))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.lock(|bus| bus.borrow_mut().read(address, buf))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus
            .lock(|bus| bus.borrow_mut().write_read(address, write_data, read_buf))
    }
}
