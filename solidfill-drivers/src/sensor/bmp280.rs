//! BMP280 barometric sensor
//!
//! Runs in normal mode with x16 oversampling on both channels, so each
//! read just fetches the latest result registers. Compensation uses the
//! floating-point formulas from the datasheet (section 8.1).

use solidfill_core::traits::{ImmediateTransport, TransportError};
use solidfill_hal::I2cBus;

/// Address with SDO pulled high
pub const ADDRESS_PRIMARY: u8 = 0x77;
/// Address with SDO pulled low
pub const ADDRESS_SECONDARY: u8 = 0x76;

/// Production chip id; 0x56/0x57 are engineering samples
const CHIP_IDS: [u8; 3] = [0x58, 0x56, 0x57];

mod reg {
    pub const CALIBRATION: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xD0;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const PRESS_MSB: u8 = 0xF7;
    pub const TEMP_MSB: u8 = 0xFA;
}

/// osrs_t = x16, osrs_p = x16, mode = normal
const CTRL_MEAS_NORMAL_X16: u8 = (0b101 << 5) | (0b101 << 2) | 0b11;
/// Standby 0.5 ms, filter off
const CONFIG_DEFAULT: u8 = 0x00;

/// Reading returned while a channel is skipped or not yet measured
const SKIPPED: i32 = 0x80000;

/// Factory trimming parameters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Calibration {
    t1: u16,
    t2: i16,
    t3: i16,
    p1: u16,
    p2: i16,
    p3: i16,
    p4: i16,
    p5: i16,
    p6: i16,
    p7: i16,
    p8: i16,
    p9: i16,
}

impl Calibration {
    fn from_bytes(b: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([b[i], b[i + 1]]);
        Self {
            t1: u(0),
            t2: s(2),
            t3: s(4),
            p1: u(6),
            p2: s(8),
            p3: s(10),
            p4: s(12),
            p5: s(14),
            p6: s(16),
            p7: s(18),
            p8: s(20),
            p9: s(22),
        }
    }

    /// Returns (°C, t_fine)
    fn temperature(&self, adc_t: i32) -> (f64, i32) {
        let adc_t = f64::from(adc_t);
        let t1 = f64::from(self.t1);
        let var1 = (adc_t / 16384.0 - t1 / 1024.0) * f64::from(self.t2);
        let d = adc_t / 131072.0 - t1 / 8192.0;
        let var2 = d * d * f64::from(self.t3);
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine as i32)
    }

    /// Pressure in Pa, `None` if the coefficients would divide by zero
    fn pressure(&self, adc_p: i32, t_fine: i32) -> Option<f64> {
        let mut var1 = f64::from(t_fine) / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * f64::from(self.p6) / 32768.0;
        var2 += var1 * f64::from(self.p5) * 2.0;
        var2 = var2 / 4.0 + f64::from(self.p4) * 65536.0;
        var1 = (f64::from(self.p3) * var1 * var1 / 524288.0 + f64::from(self.p2) * var1)
            / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * f64::from(self.p1);
        if var1 == 0.0 {
            return None;
        }

        let mut p = 1048576.0 - f64::from(adc_p);
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        var1 = f64::from(self.p9) * p * p / 2147483648.0;
        var2 = p * f64::from(self.p8) / 32768.0;
        Some(p + (var1 + var2 + f64::from(self.p7)) / 16.0)
    }
}

/// BMP280 on an I2C bus
pub struct Bmp280<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Calibration,
    t_fine: i32,
    initialized: bool,
}

impl<I2C: I2cBus> Bmp280<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            calibration: Calibration::default(),
            t_fine: 0,
            initialized: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_raw(&mut self, register: u8) -> Result<i32, TransportError> {
        if !self.initialized {
            return Err(TransportError::NotResponding);
        }
        let mut buf = [0u8; 3];
        self.i2c
            .read_registers(self.address, register, &mut buf)
            .map_err(|_| TransportError::Bus)?;

        let raw =
            (i32::from(buf[0]) << 12) | (i32::from(buf[1]) << 4) | (i32::from(buf[2]) >> 4);
        if raw == SKIPPED {
            return Err(TransportError::InvalidData);
        }
        Ok(raw)
    }
}

impl<I2C: I2cBus> ImmediateTransport for Bmp280<I2C> {
    fn init(&mut self) -> Result<(), TransportError> {
        self.initialized = false;

        let mut id = [0u8];
        self.i2c
            .read_registers(self.address, reg::CHIP_ID, &mut id)
            .map_err(|_| TransportError::NotResponding)?;
        if !CHIP_IDS.contains(&id[0]) {
            #[cfg(feature = "defmt")]
            defmt::warn!("BMP280 at {:#x}: chip id {:#x}", self.address, id[0]);

            return Err(TransportError::BadChipId);
        }

        let mut calib = [0u8; 24];
        self.i2c
            .read_registers(self.address, reg::CALIBRATION, &mut calib)
            .map_err(|_| TransportError::Bus)?;
        self.calibration = Calibration::from_bytes(&calib);
        if self.calibration.t1 == 0 || self.calibration.p1 == 0 {
            return Err(TransportError::InvalidData);
        }

        self.i2c
            .write_register(self.address, reg::CONFIG, CONFIG_DEFAULT)
            .map_err(|_| TransportError::Bus)?;
        self.i2c
            .write_register(self.address, reg::CTRL_MEAS, CTRL_MEAS_NORMAL_X16)
            .map_err(|_| TransportError::Bus)?;

        self.initialized = true;
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, TransportError> {
        let adc_t = self.read_raw(reg::TEMP_MSB)?;
        let (celsius, t_fine) = self.calibration.temperature(adc_t);
        self.t_fine = t_fine;
        Ok(celsius as f32)
    }

    /// Pressure in Pa, compensated with the last temperature read
    fn read_pressure(&mut self) -> Result<f32, TransportError> {
        let adc_p = self.read_raw(reg::PRESS_MSB)?;
        self.calibration
            .pressure(adc_p, self.t_fine)
            .map(|pa| pa as f32)
            .ok_or(TransportError::InvalidData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockI2c;

    /// Trimming values from the datasheet example
    const DATASHEET_CALIBRATION: [u8; 24] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C,
        0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    ];

    fn device() -> MockI2c {
        let mut i2c = MockI2c::new(ADDRESS_PRIMARY);
        i2c.set(reg::CHIP_ID, &[0x58]);
        i2c.set(reg::CALIBRATION, &DATASHEET_CALIBRATION);
        // adc_P = 415148, adc_T = 519888
        i2c.set(reg::PRESS_MSB, &[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]);
        i2c
    }

    #[test]
    fn test_init_configures_normal_mode() {
        let mut bmp = Bmp280::new(device(), ADDRESS_PRIMARY);
        assert_eq!(bmp.init(), Ok(()));

        let i2c = bmp.release();
        assert_eq!(i2c.registers[reg::CTRL_MEAS as usize], 0xB7);
        assert_eq!(i2c.registers[reg::CONFIG as usize], 0x00);
    }

    #[test]
    fn test_datasheet_compensation() {
        let mut bmp = Bmp280::new(device(), ADDRESS_PRIMARY);
        bmp.init().unwrap();

        let t = bmp.read_temperature().unwrap();
        assert!((t - 25.08).abs() < 0.01, "t = {}", t);
        assert_eq!(bmp.t_fine, 128422);

        let p = bmp.read_pressure().unwrap();
        assert!((p - 100653.27).abs() < 1.0, "p = {}", p);
    }

    #[test]
    fn test_wrong_chip_id() {
        let mut i2c = device();
        i2c.set(reg::CHIP_ID, &[0x55]);
        let mut bmp = Bmp280::new(i2c, ADDRESS_PRIMARY);
        assert_eq!(bmp.init(), Err(TransportError::BadChipId));
    }

    #[test]
    fn test_absent_device() {
        let mut bmp = Bmp280::new(device(), ADDRESS_SECONDARY);
        assert_eq!(bmp.init(), Err(TransportError::NotResponding));
    }

    #[test]
    fn test_read_before_init() {
        let mut bmp = Bmp280::new(device(), ADDRESS_PRIMARY);
        assert_eq!(bmp.read_pressure(), Err(TransportError::NotResponding));
    }

    #[test]
    fn test_skipped_measurement_rejected() {
        let mut i2c = device();
        i2c.set(reg::TEMP_MSB, &[0x80, 0x00, 0x00]);
        let mut bmp = Bmp280::new(i2c, ADDRESS_PRIMARY);
        bmp.init().unwrap();
        assert_eq!(bmp.read_temperature(), Err(TransportError::InvalidData));
    }

    #[test]
    fn test_bus_failure_after_init() {
        let mut bmp = Bmp280::new(device(), ADDRESS_PRIMARY);
        bmp.init().unwrap();
        bmp.i2c.fail = true;
        assert_eq!(bmp.read_temperature(), Err(TransportError::Bus));
    }
}
