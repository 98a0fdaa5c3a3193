//! SolidFill - Vacuum Casting Chamber Controller Firmware
//!
//! Firmware for STM32F103 "Blue Pill" boards. Two barometric transducers
//! share I2C1 (BMP280 at 0x76, BMP180 at 0x77), the SSD1306 OLED sits on
//! I2C2, and each chamber's vacuum pump relay hangs off an open-drain line.
//!
//! | Signal          | Pin        |
//! |-----------------|------------|
//! | I2C1 SCL / SDA  | PB6 / PB7  |
//! | I2C2 SCL / SDA  | PB10 / PB11|
//! | Relay 0 / 1     | PB0 / PB1  |
//! | Encoder A / B   | PB12 / PB13|
//! | Encoder button  | PB14       |

#![no_std]
#![no_main]

mod board;
mod channels;
mod encoder;
mod tasks;

/// Build-time configuration from controller.toml
mod config {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Input, Level, OutputOpenDrain, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Delay, Duration};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use solidfill_core::sensor::Sensor;
use solidfill_core::Controller;
use solidfill_drivers::display::{ssd1306, OledDisplay, Ssd1306};
use solidfill_drivers::relay::GpioRelay;
use solidfill_drivers::sensor::{bmp280, Bmp180, Bmp280};
use solidfill_hal::I2cConfig;
use solidfill_hal_stm32f1::i2c::SharedBus;
use solidfill_hal_stm32f1::{BlockingI2c, EncoderPin, RelayPin, SharedI2c};

use crate::board::{Board, Display};
use crate::config::CONFIG;
use crate::encoder::Encoder;

bind_interrupts!(struct Irqs {
    EXTI15_10 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI15_10>;
});

/// Transducer bus, shared by both sensor drivers
static SENSOR_BUS: StaticCell<SharedBus<BlockingI2c<'static>>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SolidFill firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // Transducers (PB6=SCL, PB7=SDA)
    let mut sensor_i2c_config = i2c::Config::default();
    sensor_i2c_config.frequency = Hertz(I2cConfig::STANDARD.frequency);
    sensor_i2c_config.timeout = Duration::from_millis(20);
    let sensor_i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, sensor_i2c_config);
    let bus: &'static SharedBus<BlockingI2c<'static>> =
        SENSOR_BUS.init(Mutex::new(RefCell::new(BlockingI2c::new(sensor_i2c))));

    // OLED (PB10=SCL, PB11=SDA)
    let mut oled_i2c_config = i2c::Config::default();
    oled_i2c_config.frequency = Hertz(I2cConfig::FAST.frequency);
    oled_i2c_config.timeout = Duration::from_millis(100);
    let oled_i2c = I2c::new_blocking(p.I2C2, p.PB10, p.PB11, oled_i2c_config);

    let mut oled = Ssd1306::new(BlockingI2c::new(oled_i2c), ssd1306::ADDRESS);
    if let Err(e) = oled.init() {
        error!("Failed to initialize display: {:?}", e);
    } else {
        info!("OLED initialized");
    }
    let display: Display = OledDisplay::new(oled);

    // Relays idle released; the relay board pulls the input high
    let relay0 = OutputOpenDrain::new(p.PB0, Level::High, Speed::Low);
    let relay1 = OutputOpenDrain::new(p.PB1, Level::High, Speed::Low);

    let mut controller: Board = Controller::new(CONFIG);
    let chambers = [
        Sensor::immediate(
            Bmp280::new(SharedI2c::new(bus), bmp280::ADDRESS_SECONDARY),
            GpioRelay::new_active_low(RelayPin::new(relay0)),
        ),
        Sensor::phased(
            Bmp180::new(SharedI2c::new(bus), Delay),
            CONFIG.pressure_oversampling,
            GpioRelay::new_active_low(RelayPin::new(relay1)),
        ),
    ];
    for sensor in chambers {
        if controller.add_sensor(sensor).is_err() {
            warn!("Sensor slots full, chamber ignored");
        }
    }

    // Encoder (PB12=A, PB13=B, PB14=Button)
    let enc_a = EncoderPin::new(Input::new(p.PB12, Pull::Up));
    let enc_b = EncoderPin::new(Input::new(p.PB13, Pull::Up));
    let enc_btn = ExtiInput::new(p.PB14, p.EXTI14, Pull::Up, Irqs);

    spawner.must_spawn(tasks::encoder_task(Encoder::new(enc_a, enc_b)));
    spawner.must_spawn(tasks::button_task(enc_btn, CONFIG.button_debounce_ms));
    spawner.must_spawn(tasks::control_task(controller, display));

    info!("All tasks spawned");
}
