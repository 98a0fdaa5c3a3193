//! Screen rendering
//!
//! Everything here draws through [`crate::traits::DisplayDriver`] and only
//! reads controller state.

pub mod layout;
pub mod renderer;
pub mod splash;

pub use layout::{center, distribute};
pub use renderer::draw;
pub use splash::{SplashFrame, SPLASH_FRAMES};
