//! Hardware abstraction traits
//!
//! These traits define the interface between the controller logic
//! and hardware-specific implementations.

pub mod display;
pub mod relay;
pub mod transport;

pub use display::{Color, DisplayDriver, DisplayError, DisplayExt};
pub use relay::RelayOutput;
pub use transport::{ImmediateTransport, PhasedTransport, TransportError};
