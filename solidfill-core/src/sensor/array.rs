//! Fixed-capacity sensor collection
//!
//! Owns every [`Sensor`] plus the editing focus: which sensor the SetVacuum
//! screen edits and which decimal digit of its target a turn changes.

use heapless::Vec;

use super::{Sensor, SensorError};
use crate::context::AppContext;
use crate::traits::{ImmediateTransport, PhasedTransport, RelayOutput, TransportError};

/// Number of sensors the controller supports
pub const MAX_SENSORS: usize = 4;

/// Decimal digit of the target being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditMagnitude {
    #[default]
    Ones,
    Tenths,
    Hundredths,
}

impl EditMagnitude {
    /// Step applied per encoder detent
    pub fn value(self) -> f32 {
        match self {
            EditMagnitude::Ones => 1.0,
            EditMagnitude::Tenths => 0.1,
            EditMagnitude::Hundredths => 0.01,
        }
    }

    /// Next finer digit, `None` after hundredths
    pub fn next(self) -> Option<Self> {
        match self {
            EditMagnitude::Ones => Some(EditMagnitude::Tenths),
            EditMagnitude::Tenths => Some(EditMagnitude::Hundredths),
            EditMagnitude::Hundredths => None,
        }
    }
}

/// Ordered sensors, in hardware order
///
/// Sensors are installed once with [`SensorArray::push`]; re-initialization
/// reuses them in place.
pub struct SensorArray<I, P, R, const N: usize = MAX_SENSORS> {
    sensors: Vec<Sensor<I, P, R>, N>,
    active: usize,
    requested: usize,
    current: usize,
    magnitude: EditMagnitude,
}

impl<I, P, R, const N: usize> SensorArray<I, P, R, N>
where
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    pub const fn new() -> Self {
        Self {
            sensors: Vec::new(),
            active: 0,
            requested: 0,
            current: 0,
            magnitude: EditMagnitude::Ones,
        }
    }

    /// Install a sensor, handing it back if the array is full
    pub fn push(&mut self, sensor: Sensor<I, P, R>) -> Result<(), Sensor<I, P, R>> {
        self.sensors.push(sensor)
    }

    /// Initialize the first `count` sensors
    ///
    /// Resets the editing focus and every sensor's calibration, then inits
    /// in order. The first failure is raised into `ctx`, all relays are
    /// released and only the sensors initialized before it stay active.
    pub fn init(&mut self, count: usize, ctx: &mut AppContext) -> Result<(), SensorError> {
        self.requested = count;
        self.current = 0;
        self.magnitude = EditMagnitude::Ones;
        self.active = 0;

        if count > self.sensors.len() {
            let e = SensorError::Init(TransportError::NotResponding);
            ctx.raise(e);
            self.disarm_all();
            return Err(e);
        }

        for sensor in self.sensors.iter_mut() {
            sensor.reset();
        }

        for index in 0..count {
            if let Err(e) = self.sensors[index].init() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Sensor {} init failed: {}", index, e);

                ctx.raise(e);
                self.disarm_all();
                return Err(e);
            }
            self.active = index + 1;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("{} sensors initialized", count);

        Ok(())
    }

    /// Repeat the last [`SensorArray::init`] with the same count
    pub fn reinit(&mut self, ctx: &mut AppContext) -> Result<(), SensorError> {
        self.init(self.requested, ctx)
    }

    /// Advance every active sensor by one tick, in index order
    ///
    /// If any sensor raised an error, relays already refreshed earlier in
    /// the same pass are released too.
    pub fn read(&mut self, ctx: &mut AppContext) {
        for sensor in self.sensors.iter_mut().take(self.active) {
            sensor.read(ctx);
        }
        if ctx.error().is_set() {
            self.disarm_all();
        }
    }

    /// Release every installed relay
    pub fn disarm_all(&mut self) {
        for sensor in self.sensors.iter_mut() {
            sensor.disarm();
        }
    }

    /// Number of active sensors
    pub fn count(&self) -> usize {
        self.active
    }

    /// Number of installed sensors
    pub fn installed(&self) -> usize {
        self.sensors.len()
    }

    pub fn at(&self, index: usize) -> Option<&Sensor<I, P, R>> {
        self.sensors[..self.active].get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Sensor<I, P, R>> {
        self.sensors[..self.active].get_mut(index)
    }

    /// Sensor under edit
    pub fn current(&self) -> Option<&Sensor<I, P, R>> {
        self.at(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Sensor<I, P, R>> {
        self.at_mut(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Focus a sensor for editing
    ///
    /// Returns `false` and keeps the focus when `index` is not active.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.active {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn edit_magnitude(&self) -> EditMagnitude {
        self.magnitude
    }

    pub fn set_edit_magnitude(&mut self, magnitude: EditMagnitude) {
        self.magnitude = magnitude;
    }

    /// Active sensors in index order
    pub fn iter(&self) -> impl Iterator<Item = &Sensor<I, P, R>> {
        self.sensors.iter().take(self.active)
    }
}

impl<I, P, R, const N: usize> Default for SensorArray<I, P, R, N>
where
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    fn default() -> Self {
        Self::new()
    }
}
