//! Timer-gated acquisition variant
//!
//! The handshake runs one step per tick:
//!
//! ```text
//!   Idle ──start temp──▶ AwaitingTemperature ──wait elapsed, get temp,──▶ AwaitingPressure
//!    ▲                                            start pressure               │
//!    └──────────────── get pressure (waits internally), reading ◀──────────────┘
//! ```
//!
//! Any failure drops back to `Idle`; a failed phase is never re-entered
//! directly.

use super::{Quantity, Reading, SensorError};
use crate::traits::{PhasedTransport, TransportError};

/// Check a conversion start; a zero wait counts as a refused start
fn started(quantity: Quantity, result: Result<u8, TransportError>) -> Result<u8, SensorError> {
    match result {
        Ok(0) => Err(SensorError::AcquisitionStart(
            quantity,
            TransportError::NotResponding,
        )),
        Ok(wait) => Ok(wait),
        Err(e) => Err(SensorError::AcquisitionStart(quantity, e)),
    }
}

/// Step of the conversion handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No conversion running
    Idle,
    /// Temperature conversion started, waiting for its deadline
    AwaitingTemperature,
    /// Pressure conversion started, read on the next tick
    AwaitingPressure,
}

/// Sensor variant driving a [`PhasedTransport`]
pub struct PhasedSensor<T> {
    transport: T,
    phase: Phase,
    started_ms: u32,
    wait_ms: u32,
    temperature: f32,
    oversampling: u8,
}

impl<T: PhasedTransport> PhasedSensor<T> {
    pub fn new(transport: T, oversampling: u8) -> Self {
        Self {
            transport,
            phase: Phase::Idle,
            started_ms: 0,
            wait_ms: 0,
            temperature: 0.0,
            oversampling,
        }
    }

    pub fn init(&mut self) -> Result<(), TransportError> {
        self.phase = Phase::Idle;
        self.transport.init()
    }

    /// Abandon any conversion in flight
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.wait_ms = 0;
    }

    /// Advance the handshake by one step
    ///
    /// Returns a reading only on the `AwaitingPressure -> Idle` transition.
    pub fn read(&mut self, now_ms: u32) -> Result<Option<Reading>, SensorError> {
        match self.phase {
            Phase::Idle => {
                let wait = started(Quantity::Temperature, self.transport.start_temperature())?;
                self.arm(Phase::AwaitingTemperature, now_ms, wait);
                Ok(None)
            }
            Phase::AwaitingTemperature => {
                if now_ms.wrapping_sub(self.started_ms) < self.wait_ms {
                    return Ok(None);
                }

                self.phase = Phase::Idle;
                self.temperature = self
                    .transport
                    .get_temperature()
                    .map_err(|e| SensorError::AcquisitionRead(Quantity::Temperature, e))?;
                let wait = started(
                    Quantity::Pressure,
                    self.transport.start_pressure(self.oversampling),
                )?;
                self.arm(Phase::AwaitingPressure, now_ms, wait);
                Ok(None)
            }
            Phase::AwaitingPressure => {
                self.phase = Phase::Idle;
                let pressure = self
                    .transport
                    .get_pressure(self.temperature)
                    .map_err(|e| SensorError::AcquisitionRead(Quantity::Pressure, e))?;

                Ok(Some(Reading {
                    temperature: self.temperature,
                    pressure,
                }))
            }
        }
    }

    fn arm(&mut self, phase: Phase, now_ms: u32, wait: u8) {
        self.phase = phase;
        self.started_ms = now_ms;
        self.wait_ms = u32::from(wait);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time at which the current wait ends
    pub fn deadline_ms(&self) -> u32 {
        self.started_ms.wrapping_add(self.wait_ms)
    }

    pub fn oversampling(&self) -> u8 {
        self.oversampling
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
