//! Operator-facing state machine
//!
//! Explicit, finite and deterministic: the mode after a tick depends only on
//! the mode before it, the tick's input and the error state.

pub mod machine;
pub mod menu;

pub use machine::{Mode, SystemStateMachine};
pub use menu::{MainMenuItem, Menu, MenuCategory, MenuItem, VacuumMenuItem};
