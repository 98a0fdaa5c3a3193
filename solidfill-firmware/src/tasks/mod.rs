//! Embassy async tasks
//!
//! Input tasks only write to [`crate::channels::EDGES`]; the control task
//! is the single owner of the controller and the display.

pub mod button;
pub mod control;
pub mod encoder;

pub use button::button_task;
pub use control::control_task;
pub use encoder::encoder_task;
