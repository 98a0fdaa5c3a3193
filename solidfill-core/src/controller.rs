//! Control loop tick
//!
//! Ties the state machine, the sensors and the context together in the
//! fixed per-tick order:
//!
//! ```text
//! input ──▶ SystemStateMachine ──▶ SensorArray::read ──▶ error check ──▶ render
//! ```

use crate::config::ControllerConfig;
use crate::context::AppContext;
use crate::input::InputEvents;
use crate::sensor::{Sensor, SensorArray, SensorError, MAX_SENSORS};
use crate::state::{Mode, SystemStateMachine};
use crate::traits::{
    DisplayDriver, DisplayError, ImmediateTransport, PhasedTransport, RelayOutput,
};
use crate::ui;

/// The whole controller, minus the hardware drivers it is generic over
pub struct Controller<I, P, R, const N: usize = MAX_SENSORS> {
    machine: SystemStateMachine,
    sensors: SensorArray<I, P, R, N>,
    ctx: AppContext,
    config: ControllerConfig,
}

impl<I, P, R, const N: usize> Controller<I, P, R, N>
where
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            machine: SystemStateMachine::new(),
            sensors: SensorArray::new(),
            ctx: AppContext::new(),
            config,
        }
    }

    /// Install a sensor, in hardware order
    pub fn add_sensor(&mut self, sensor: Sensor<I, P, R>) -> Result<(), Sensor<I, P, R>> {
        self.sensors.push(sensor)
    }

    /// Initialize the configured sensors
    ///
    /// A failure leaves the controller on the error screen.
    pub fn start(&mut self) -> Result<(), SensorError> {
        let result = self
            .sensors
            .init(usize::from(self.config.sensor_count), &mut self.ctx);
        self.machine.check_error(&self.ctx);
        result
    }

    /// Run one control tick
    pub fn tick(&mut self, input: InputEvents, now_ms: u32) {
        self.ctx.set_now_ms(now_ms);
        self.machine.update(input, &mut self.ctx, &mut self.sensors);
        self.sensors.read(&mut self.ctx);
        self.machine.check_error(&self.ctx);
    }

    /// Draw the current state and push the frame
    pub fn render<D: DisplayDriver>(&self, display: &mut D) -> Result<(), DisplayError> {
        ui::draw(display, &self.machine, &self.ctx, &self.sensors)
    }

    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    pub fn machine(&self) -> &SystemStateMachine {
        &self.machine
    }

    pub fn sensors(&self) -> &SensorArray<I, P, R, N> {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut SensorArray<I, P, R, N> {
        &mut self.sensors
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
