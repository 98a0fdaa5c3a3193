//! Concrete driver types for this board

use embassy_time::Delay;
use solidfill_core::Controller;
use solidfill_drivers::display::{OledDisplay, Ssd1306};
use solidfill_drivers::relay::GpioRelay;
use solidfill_drivers::sensor::{Bmp180, Bmp280};
use solidfill_hal_stm32f1::{BlockingI2c, RelayPin, SharedI2c};

/// Handle onto the shared transducer bus
pub type SensorBus = SharedI2c<'static, BlockingI2c<'static>>;

pub type ImmediateDriver = Bmp280<SensorBus>;
pub type PhasedDriver = Bmp180<SensorBus, Delay>;
pub type Relay = GpioRelay<RelayPin<'static>>;

/// Controller wired to this board's drivers
pub type Board = Controller<ImmediateDriver, PhasedDriver, Relay>;

pub type Display = OledDisplay<Ssd1306<BlockingI2c<'static>>>;
