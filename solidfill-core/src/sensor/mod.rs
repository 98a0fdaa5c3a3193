//! Single-transducer sensor with its vacuum relay
//!
//! A [`Sensor`] wraps one transport in one of two acquisition variants and
//! owns the relay of its chamber. Both variants share the post-processing
//! applied when a reading completes:
//!
//! 1. latch the reference on the first reading
//! 2. normalize pressure against the reference
//! 3. energize the relay iff the system is active and pressure is below target

pub mod array;
pub mod immediate;
pub mod phased;

pub use array::{EditMagnitude, SensorArray, MAX_SENSORS};
pub use immediate::ImmediateSensor;
pub use phased::{Phase, PhasedSensor};

use crate::context::AppContext;
use crate::traits::{ImmediateTransport, PhasedTransport, RelayOutput, TransportError};

/// Sentinel for an unlatched reference or an unset target
pub const UNSET: f32 = -1.0;

/// Measured quantity, used to tag acquisition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Temperature,
    Pressure,
}

/// Sensor failures surfaced to the operator
///
/// None of these are retried automatically; the operator re-initializes
/// from the error screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Device did not come up
    Init(TransportError),
    /// Conversion could not be started
    AcquisitionStart(Quantity, TransportError),
    /// Conversion result could not be read
    AcquisitionRead(Quantity, TransportError),
}

impl SensorError {
    /// Operator-facing message
    pub fn message(&self) -> &'static str {
        match self {
            SensorError::Init(_) => "Sensor Init",
            SensorError::AcquisitionStart(Quantity::Temperature, _) => "Sensor temp. start",
            SensorError::AcquisitionRead(Quantity::Temperature, _) => "Sensor temp. measure",
            SensorError::AcquisitionStart(Quantity::Pressure, _) => "Sensor pres. start",
            SensorError::AcquisitionRead(Quantity::Pressure, _) => "Sensor pres. measure",
        }
    }

    /// Underlying transport failure
    pub fn transport(&self) -> TransportError {
        match *self {
            SensorError::Init(e)
            | SensorError::AcquisitionStart(_, e)
            | SensorError::AcquisitionRead(_, e) => e,
        }
    }
}

/// Raw temperature and pressure from one completed acquisition
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub temperature: f32,
    pub pressure: f32,
}

/// Acquisition variant of a sensor
pub enum Acquisition<I, P> {
    Immediate(ImmediateSensor<I>),
    Phased(PhasedSensor<P>),
}

/// One transducer, its calibration and its relay
pub struct Sensor<I, P, R> {
    acquisition: Acquisition<I, P>,
    relay: R,
    temperature: f32,
    pressure: f32,
    reference: f32,
    target: f32,
}

impl<I: ImmediateTransport, P: PhasedTransport, R: RelayOutput> Sensor<I, P, R> {
    /// Sensor that reads both quantities synchronously every tick
    pub fn immediate(transport: I, relay: R) -> Self {
        Self::new(Acquisition::Immediate(ImmediateSensor::new(transport)), relay)
    }

    /// Sensor that runs the timer-gated conversion handshake
    pub fn phased(transport: P, oversampling: u8, relay: R) -> Self {
        Self::new(
            Acquisition::Phased(PhasedSensor::new(transport, oversampling)),
            relay,
        )
    }

    fn new(acquisition: Acquisition<I, P>, mut relay: R) -> Self {
        relay.set_energized(false);
        Self {
            acquisition,
            relay,
            temperature: 0.0,
            pressure: 0.0,
            reference: UNSET,
            target: UNSET,
        }
    }

    /// Bring up the transport
    pub fn init(&mut self) -> Result<(), SensorError> {
        let result = match &mut self.acquisition {
            Acquisition::Immediate(sensor) => sensor.init(),
            Acquisition::Phased(sensor) => sensor.init(),
        };
        result.map_err(SensorError::Init)
    }

    /// Return to the freshly constructed state
    ///
    /// Unlatches the reference, unsets the target, drops the relay and
    /// abandons any conversion in flight.
    pub fn reset(&mut self) {
        self.temperature = 0.0;
        self.pressure = 0.0;
        self.reference = UNSET;
        self.target = UNSET;
        self.relay.set_energized(false);
        if let Acquisition::Phased(sensor) = &mut self.acquisition {
            sensor.reset();
        }
    }

    /// Advance acquisition by one tick and refresh the relay
    ///
    /// Acquisition failures are raised into `ctx`, which also clears the
    /// active flag, so the relay refresh that follows releases the relay.
    pub fn read(&mut self, ctx: &mut AppContext) {
        let now_ms = ctx.now_ms();
        let result = match &mut self.acquisition {
            Acquisition::Immediate(sensor) => sensor.read().map(Some),
            Acquisition::Phased(sensor) => sensor.read(now_ms),
        };

        match result {
            Ok(Some(reading)) => self.complete(reading),
            Ok(None) => {}
            Err(e) => ctx.raise(e),
        }

        self.actuate(ctx.is_active());
    }

    fn complete(&mut self, reading: Reading) {
        self.temperature = reading.temperature;
        if self.reference < 0.0 {
            self.reference = reading.pressure;
        }
        self.pressure = reading.pressure / self.reference;
    }

    fn actuate(&mut self, active: bool) {
        self.relay
            .set_energized(active && self.pressure < self.target);
    }

    /// Release the relay without touching the readings
    pub fn disarm(&mut self) {
        self.relay.set_energized(false);
    }

    /// Last temperature (°C)
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Last pressure, normalized against the reference
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Latched raw reference pressure, [`UNSET`] until the first reading
    pub fn reference(&self) -> f32 {
        self.reference
    }

    /// Check if the reference has been latched
    pub fn is_calibrated(&self) -> bool {
        self.reference >= 0.0
    }

    /// Normalized target pressure, [`UNSET`] until set
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Shift the target by `delta`, unclamped
    pub fn adjust_target(&mut self, delta: f32) {
        self.target += delta;
    }

    /// Check if the relay is energized
    pub fn is_energized(&self) -> bool {
        self.relay.is_energized()
    }

    /// Current handshake phase, `None` for immediate sensors
    pub fn phase(&self) -> Option<Phase> {
        match &self.acquisition {
            Acquisition::Immediate(_) => None,
            Acquisition::Phased(sensor) => Some(sensor.phase()),
        }
    }

    pub fn acquisition(&self) -> &Acquisition<I, P> {
        &self.acquisition
    }

    pub fn acquisition_mut(&mut self) -> &mut Acquisition<I, P> {
        &mut self.acquisition
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transports and relay shared by the core tests

    use heapless::Deque;

    use crate::traits::{ImmediateTransport, PhasedTransport, RelayOutput, TransportError};

    pub type Scripted = Deque<Result<f32, TransportError>, 16>;

    /// Immediate transport returning queued pressures
    #[derive(Default)]
    pub struct MockImmediate {
        pub init_result: Option<TransportError>,
        pub init_calls: u32,
        pub temperature: f32,
        pub pressures: Scripted,
        pub last_pressure: f32,
    }

    impl MockImmediate {
        pub fn with_pressures(values: &[f32]) -> Self {
            let mut mock = Self {
                temperature: 21.5,
                ..Self::default()
            };
            for v in values {
                mock.pressures.push_back(Ok(*v)).ok();
            }
            mock
        }

        pub fn push(&mut self, value: Result<f32, TransportError>) {
            self.pressures.push_back(value).ok();
        }
    }

    impl ImmediateTransport for MockImmediate {
        fn init(&mut self) -> Result<(), TransportError> {
            self.init_calls += 1;
            match self.init_result {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        fn read_temperature(&mut self) -> Result<f32, TransportError> {
            Ok(self.temperature)
        }

        fn read_pressure(&mut self) -> Result<f32, TransportError> {
            match self.pressures.pop_front() {
                Some(Ok(v)) => {
                    self.last_pressure = v;
                    Ok(v)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last_pressure),
            }
        }
    }

    /// Calls recorded by [`MockPhased`]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum PhasedCall {
        StartTemperature,
        GetTemperature,
        StartPressure(u8),
        GetPressure(f32),
    }

    /// Phased transport with fixed waits and scriptable failures
    pub struct MockPhased {
        pub init_result: Option<TransportError>,
        pub temperature_wait: u8,
        pub pressure_wait: u8,
        pub temperature: f32,
        pub pressure: f32,
        pub fail_start_temperature: Option<TransportError>,
        pub fail_get_temperature: Option<TransportError>,
        pub fail_start_pressure: Option<TransportError>,
        pub fail_get_pressure: Option<TransportError>,
        pub calls: heapless::Vec<PhasedCall, 64>,
    }

    impl MockPhased {
        pub fn new(temperature: f32, pressure: f32) -> Self {
            Self {
                init_result: None,
                temperature_wait: 5,
                pressure_wait: 26,
                temperature,
                pressure,
                fail_start_temperature: None,
                fail_get_temperature: None,
                fail_start_pressure: None,
                fail_get_pressure: None,
                calls: heapless::Vec::new(),
            }
        }

        fn record(&mut self, call: PhasedCall) {
            self.calls.push(call).ok();
        }
    }

    impl PhasedTransport for MockPhased {
        fn init(&mut self) -> Result<(), TransportError> {
            match self.init_result {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        fn start_temperature(&mut self) -> Result<u8, TransportError> {
            self.record(PhasedCall::StartTemperature);
            match self.fail_start_temperature {
                Some(e) => Err(e),
                None => Ok(self.temperature_wait),
            }
        }

        fn get_temperature(&mut self) -> Result<f32, TransportError> {
            self.record(PhasedCall::GetTemperature);
            match self.fail_get_temperature {
                Some(e) => Err(e),
                None => Ok(self.temperature),
            }
        }

        fn start_pressure(&mut self, oversampling: u8) -> Result<u8, TransportError> {
            self.record(PhasedCall::StartPressure(oversampling));
            match self.fail_start_pressure {
                Some(e) => Err(e),
                None => Ok(self.pressure_wait),
            }
        }

        fn get_pressure(&mut self, temperature: f32) -> Result<f32, TransportError> {
            self.record(PhasedCall::GetPressure(temperature));
            match self.fail_get_pressure {
                Some(e) => Err(e),
                None => Ok(self.pressure),
            }
        }
    }

    /// Relay recording its state
    #[derive(Default)]
    pub struct MockRelay {
        pub energized: bool,
        pub writes: u32,
    }

    impl RelayOutput for MockRelay {
        fn set_energized(&mut self, energized: bool) {
            self.energized = energized;
            self.writes += 1;
        }

        fn is_energized(&self) -> bool {
            self.energized
        }
    }

    pub type TestSensor = super::Sensor<MockImmediate, MockPhased, MockRelay>;
}
