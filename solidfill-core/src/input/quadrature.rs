//! Quadrature encoder decoding
//!
//! Pure state machine fed with sampled A/B line levels; repeated samples
//! are ignored. Both lines idle high (pull-ups).

/// One completed detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Clockwise,
    CounterClockwise,
}

impl Step {
    /// Signed position delta
    pub fn delta(self) -> i32 {
        match self {
            Step::Clockwise => 1,
            Step::CounterClockwise => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Decoder with bounce rejection
///
/// ```text
/// CW:  (1,1) -> A falls (0,1) -> both low (0,0) -> either rises: step
/// CCW: (1,1) -> B falls (1,0) -> both low (0,0) -> either rises: step
/// ```
///
/// Returning to (1,1) before both lines are low discards the partial step.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    state: State,
    last_a: bool,
    last_b: bool,
}

impl QuadratureDecoder {
    /// Create a decoder from the current line levels
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: State::Idle,
            last_a: a,
            last_b: b,
        }
    }

    /// Feed the current line levels
    pub fn update(&mut self, a: bool, b: bool) -> Option<Step> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        match self.state {
            State::Idle => {
                if !a && b {
                    self.state = State::CwStep1;
                } else if a && !b {
                    self.state = State::CcwStep1;
                }
                None
            }
            State::CwStep1 | State::CcwStep1 => {
                if !a && !b {
                    self.state = if self.state == State::CwStep1 {
                        State::CwStep2
                    } else {
                        State::CcwStep2
                    };
                } else if a && b {
                    self.state = State::Idle;
                }
                None
            }
            State::CwStep2 | State::CcwStep2 => {
                if !(a || b) {
                    return None;
                }
                let step = if self.state == State::CwStep2 {
                    Step::Clockwise
                } else {
                    Step::CounterClockwise
                };
                self.state = State::Idle;
                Some(step)
            }
        }
    }
}
