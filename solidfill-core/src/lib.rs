//! Board-agnostic core logic for the SolidFill vacuum casting controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (sensor transport, relay, display)
//! - Sensor acquisition variants and the sensor array
//! - System and menu state machine
//! - Input edge buffer and encoder decoding
//! - Screen rendering
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod controller;
pub mod input;
pub mod sensor;
pub mod state;
pub mod traits;
pub mod ui;

pub use config::{ConfigError, ControllerConfig};
pub use context::{AppContext, ErrorState};
pub use controller::Controller;
