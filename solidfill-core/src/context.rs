//! Application context shared by the control loop
//!
//! Holds what used to be process-wide mutable state: the `active` flag that
//! gates every relay, the sticky [`ErrorState`], and the tick timestamp.
//!
//! Write ownership within a tick:
//! - `active` is toggled only by the state machine; raising an error clears it
//! - the error is raised by sensors and the sensor array, and cleared only by
//!   the state machine's re-initialization action
//! - `now_ms` is set once by the controller at the start of the tick

use heapless::String;

use crate::sensor::SensorError;

/// Maximum stored error message length (one display line at text size 1)
pub const ERROR_MESSAGE_LEN: usize = 32;

/// Message used when an error is raised with empty text
const FALLBACK_MESSAGE: &str = "Unknown error";

/// Sticky error condition
///
/// A non-empty message means the system is in error. Raising an error never
/// overwrites the mode directly; the state machine observes it on its next
/// evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorState {
    message: String<ERROR_MESSAGE_LEN>,
    source: Option<SensorError>,
}

impl ErrorState {
    /// Create an empty (no error) state
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            source: None,
        }
    }

    /// Check if an error is currently set
    pub fn is_set(&self) -> bool {
        !self.message.is_empty()
    }

    /// Operator-facing message, empty when no error is set
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Sensor error that raised the current message, if any
    pub fn source(&self) -> Option<SensorError> {
        self.source
    }

    /// Message length in characters
    pub fn len(&self) -> usize {
        self.message.chars().count()
    }

    /// Check if the message is empty
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    fn set(&mut self, message: &str, source: Option<SensorError>) {
        let message = if message.is_empty() {
            FALLBACK_MESSAGE
        } else {
            message
        };

        self.message.clear();
        for ch in message.chars() {
            if self.message.push(ch).is_err() {
                break;
            }
        }
        self.source = source;
    }

    fn clear(&mut self) {
        self.message.clear();
        self.source = None;
    }
}

/// Explicit replacement for the controller's global flags
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    active: bool,
    error: ErrorState,
    now_ms: u32,
}

impl AppContext {
    /// Create a context: inactive, no error, time zero
    pub const fn new() -> Self {
        Self {
            active: false,
            error: ErrorState::new(),
            now_ms: 0,
        }
    }

    /// Check if relays are allowed to energize
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable actuation
    ///
    /// Enabling is refused while an error is set.
    pub fn set_active(&mut self, active: bool) {
        self.active = active && !self.error.is_set();
    }

    /// Flip the active flag, returning the new value
    pub fn toggle_active(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    /// Current error state
    pub fn error(&self) -> &ErrorState {
        &self.error
    }

    /// Raise a sensor error
    pub fn raise(&mut self, error: SensorError) {
        self.raise_with(error.message(), Some(error));
    }

    /// Raise an error with a free-form message
    pub fn raise_message(&mut self, message: &str) {
        self.raise_with(message, None);
    }

    fn raise_with(&mut self, message: &str, source: Option<SensorError>) {
        self.error.set(message, source);
        self.active = false;

        #[cfg(feature = "defmt")]
        defmt::warn!("Error raised: {}", self.error.message());
    }

    /// Clear the error message
    ///
    /// Does not restore `active` and does not change the mode.
    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    /// Timestamp of the current tick (ms, wrapping)
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Set the timestamp for the current tick
    pub fn set_now_ms(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }
}
