//! State shared between the input tasks and the control loop

use solidfill_core::input::EdgeBuffer;

/// Encoder steps and clicks recorded since the last tick
pub static EDGES: EdgeBuffer = EdgeBuffer::new();
