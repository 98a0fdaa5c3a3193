//! SolidFill Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so that sensor and relay
//! drivers never name a concrete MCU type.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  solidfill-drivers (BMP180, BMP280, …)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  solidfill-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  solidfill-hal-stm32f1                  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (relay lines)
//! - [`gpio::InputPin`] - Digital input (encoder lines)
//! - [`i2c::I2cBus`] - I2C master (transducers, OLED)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

pub use gpio::{InputPin, OutputPin};
pub use i2c::{I2cBus, I2cConfig};
