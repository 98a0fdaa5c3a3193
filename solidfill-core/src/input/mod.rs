//! Operator input
//!
//! Interrupt-side code only ever touches the [`EdgeBuffer`]; the control
//! loop drains it into one [`InputEvents`] per tick.

pub mod quadrature;

pub use quadrature::{QuadratureDecoder, Step};

use portable_atomic::{AtomicBool, AtomicI32, Ordering};

/// Input sampled for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvents {
    /// Encoder direction since the last tick: -1, 0 or +1
    pub turn: i8,
    /// Button clicked since the last tick
    pub click: bool,
}

impl InputEvents {
    pub const NONE: Self = Self {
        turn: 0,
        click: false,
    };

    pub const CLICK: Self = Self {
        turn: 0,
        click: true,
    };

    /// Turn by one detent in the direction of `direction`
    pub fn turn(direction: i8) -> Self {
        Self {
            turn: direction.signum(),
            click: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.turn == 0 && !self.click
    }
}

/// Lock-free buffer between input interrupts and the control loop
///
/// Multiple steps between two ticks collapse into one direction and
/// multiple clicks collapse into one click.
pub struct EdgeBuffer {
    position: AtomicI32,
    consumed: AtomicI32,
    click: AtomicBool,
}

impl EdgeBuffer {
    pub const fn new() -> Self {
        Self {
            position: AtomicI32::new(0),
            consumed: AtomicI32::new(0),
            click: AtomicBool::new(false),
        }
    }

    /// Record encoder movement (positive is clockwise)
    pub fn record_step(&self, delta: i32) {
        self.position.fetch_add(delta, Ordering::Relaxed);
    }

    /// Record a debounced button press
    pub fn record_click(&self) {
        self.click.store(true, Ordering::Release);
    }

    /// Drain everything recorded since the previous call
    pub fn take(&self) -> InputEvents {
        let position = self.position.load(Ordering::Relaxed);
        let previous = self.consumed.swap(position, Ordering::Relaxed);
        let turn = position.wrapping_sub(previous).signum() as i8;

        InputEvents {
            turn,
            click: self.click.swap(false, Ordering::Acquire),
        }
    }
}

impl Default for EdgeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
