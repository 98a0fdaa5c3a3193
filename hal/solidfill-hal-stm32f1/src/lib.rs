//! STM32F1-specific HAL for the SolidFill firmware
//!
//! Implements the `solidfill-hal` traits on top of embassy-stm32 so the
//! drivers can run on the STM32F103 board without naming embassy types.
//!
//! # Features
//!
//! - `stm32f103c8` - Enable support for STM32F103C8T6 (Blue Pill)
//! - `stm32f103cb` - Enable support for STM32F103CBT6
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod gpio;
pub mod i2c;

pub use gpio::{EncoderPin, RelayPin};
pub use i2c::{BlockingI2c, I2cBusError, SharedI2c};
