//! Controller configuration
//!
//! Fixed at build time: the firmware parses `controller.toml` in its build
//! script and embeds the validated result.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sensor::MAX_SENSORS;

/// Tunable controller parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ControllerConfig {
    /// Sensors to initialize, in hardware order
    pub sensor_count: u8,
    /// Control loop period (ms)
    pub tick_interval_ms: u32,
    /// Oversampling setting passed to phased pressure conversions (0-3)
    pub pressure_oversampling: u8,
    /// Play the boot splash
    pub splash: bool,
    /// Button debounce time (ms)
    pub button_debounce_ms: u32,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        sensor_count: 2,
        tick_interval_ms: 50,
        pressure_oversampling: 3,
        splash: true,
        button_debounce_ms: 20,
    };

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_count == 0 || usize::from(self.sensor_count) > MAX_SENSORS {
            return Err(ConfigError::SensorCount(self.sensor_count));
        }
        if !(10..=1000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::TickInterval(self.tick_interval_ms));
        }
        if self.pressure_oversampling > 3 {
            return Err(ConfigError::Oversampling(self.pressure_oversampling));
        }
        if !(1..=200).contains(&self.button_debounce_ms) {
            return Err(ConfigError::Debounce(self.button_debounce_ms));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Out-of-range configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sensor count outside 1..=4
    SensorCount(u8),
    /// Tick interval outside 10..=1000 ms
    TickInterval(u32),
    /// Oversampling setting above 3
    Oversampling(u8),
    /// Debounce outside 1..=200 ms
    Debounce(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::SensorCount(v) => {
                write!(f, "sensor_count = {} (expected 1..={})", v, MAX_SENSORS)
            }
            ConfigError::TickInterval(v) => {
                write!(f, "tick_interval_ms = {} (expected 10..=1000)", v)
            }
            ConfigError::Oversampling(v) => {
                write!(f, "pressure_oversampling = {} (expected 0..=3)", v)
            }
            ConfigError::Debounce(v) => {
                write!(f, "button_debounce_ms = {} (expected 1..=200)", v)
            }
        }
    }
}
