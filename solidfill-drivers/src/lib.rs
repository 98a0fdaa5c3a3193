//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in solidfill-core for the controller's hardware:
//!
//! - Pressure/temperature transducers (BMP280 immediate, BMP180 phased)
//! - Vacuum relays on GPIO lines
//! - SSD1306 OLED with an embedded-graphics adapter

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod relay;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
