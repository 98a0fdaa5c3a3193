//! BMP180 barometric sensor
//!
//! Every reading is a command/wait/fetch cycle, so the driver exposes the
//! halves separately and lets the caller schedule the wait. Compensation
//! follows the integer algorithm of the datasheet (section 3.5).

use embedded_hal::delay::DelayNs;
use solidfill_core::traits::{PhasedTransport, TransportError};
use solidfill_hal::I2cBus;

/// Fixed bus address
pub const ADDRESS: u8 = 0x77;

const CHIP_ID: u8 = 0x55;

mod reg {
    pub const CALIBRATION: u8 = 0xAA;
    pub const CHIP_ID: u8 = 0xD0;
    pub const CONTROL: u8 = 0xF4;
    pub const RESULT: u8 = 0xF6;
}

mod cmd {
    pub const TEMPERATURE: u8 = 0x2E;
    pub const PRESSURE: u8 = 0x34;
}

/// Start of conversion bit in the control register, cleared when done
const SCO: u8 = 1 << 5;

/// Temperature conversion time (ms)
const TEMPERATURE_WAIT_MS: u8 = 5;

/// Pressure conversion time (ms) by oversampling setting
const PRESSURE_WAIT_MS: [u8; 4] = [5, 8, 14, 26];

/// Polls of the SCO bit before giving up on a conversion
const POLL_LIMIT: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Calibration {
    ac1: i16,
    ac2: i16,
    ac3: i16,
    ac4: u16,
    ac5: u16,
    ac6: u16,
    b1: i16,
    b2: i16,
    mb: i16,
    mc: i16,
    md: i16,
}

impl Calibration {
    /// Parse the EEPROM block, `None` if any word reads 0x0000 or 0xFFFF
    fn from_bytes(b: &[u8; 22]) -> Option<Self> {
        let mut words = [0u16; 11];
        for (i, word) in words.iter_mut().enumerate() {
            *word = u16::from_be_bytes([b[2 * i], b[2 * i + 1]]);
            if *word == 0x0000 || *word == 0xFFFF {
                return None;
            }
        }

        Some(Self {
            ac1: words[0] as i16,
            ac2: words[1] as i16,
            ac3: words[2] as i16,
            ac4: words[3],
            ac5: words[4],
            ac6: words[5],
            b1: words[6] as i16,
            b2: words[7] as i16,
            mb: words[8] as i16,
            mc: words[9] as i16,
            md: words[10] as i16,
        })
    }

    /// Intermediate B5 from the raw temperature
    fn b5(&self, ut: i32) -> Option<i32> {
        let x1 = ((i64::from(ut) - i64::from(self.ac6)) * i64::from(self.ac5)) >> 15;
        let denominator = x1 + i64::from(self.md);
        if denominator == 0 {
            return None;
        }
        let x2 = (i64::from(self.mc) << 11) / denominator;
        i32::try_from(x1 + x2).ok()
    }

    /// Pressure in Pa, `None` when the inputs push the integer math out of range
    fn pressure(&self, up: i32, b5: i32, oss: u8) -> Option<i32> {
        let b6 = i64::from(b5) - 4000;
        let b6_sq = b6.checked_mul(b6)? >> 12;
        let x1 = i64::from(self.b2).checked_mul(b6_sq)? >> 11;
        let x2 = i64::from(self.ac2).checked_mul(b6)? >> 11;
        let x3 = x1.checked_add(x2)?;
        let b3 = (i64::from(self.ac1) * 4)
            .checked_add(x3)?
            .checked_mul(1 << oss)?
            .checked_add(2)?
            / 4;

        let x1 = i64::from(self.ac3).checked_mul(b6)? >> 13;
        let x2 = i64::from(self.b1).checked_mul(b6_sq)? >> 16;
        let x3 = x1.checked_add(x2)?.checked_add(2)? >> 2;
        let b4 = i64::from(self.ac4).checked_mul(x3.checked_add(32768)?)? >> 15;
        if b4 <= 0 {
            return None;
        }

        let b7 = i64::from(up)
            .checked_sub(b3)?
            .checked_mul(50000 >> oss)?;
        if b7 < 0 {
            return None;
        }
        let p = if b7 < 0x8000_0000 {
            (b7 * 2) / b4
        } else {
            (b7 / b4).checked_mul(2)?
        };

        let x1 = (p >> 8).checked_mul(p >> 8)?.checked_mul(3038)? >> 16;
        let x2 = p.checked_mul(-7357)? >> 16;
        let p = p.checked_add(x1.checked_add(x2)?.checked_add(3791)? >> 4)?;
        i32::try_from(p).ok()
    }
}

/// BMP180 on an I2C bus
///
/// The delay is only used while waiting for the conversion bit during a
/// pressure fetch that comes early.
pub struct Bmp180<I2C, D> {
    i2c: I2C,
    delay: D,
    calibration: Calibration,
    oversampling: u8,
    initialized: bool,
}

impl<I2C: I2cBus, D: DelayNs> Bmp180<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            calibration: Calibration::default(),
            oversampling: 0,
            initialized: false,
        }
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn start(&mut self, command: u8) -> Result<(), TransportError> {
        if !self.initialized {
            return Err(TransportError::NotResponding);
        }
        self.i2c
            .write_register(ADDRESS, reg::CONTROL, command)
            .map_err(|_| TransportError::Bus)
    }

    /// Block until the running conversion finishes
    fn wait_ready(&mut self) -> Result<(), TransportError> {
        for _ in 0..POLL_LIMIT {
            let mut control = [0u8];
            self.i2c
                .read_registers(ADDRESS, reg::CONTROL, &mut control)
                .map_err(|_| TransportError::Bus)?;
            if control[0] & SCO == 0 {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(TransportError::NotResponding)
    }

    fn fetch<const LEN: usize>(&mut self) -> Result<[u8; LEN], TransportError> {
        let mut buf = [0u8; LEN];
        self.i2c
            .read_registers(ADDRESS, reg::RESULT, &mut buf)
            .map_err(|_| TransportError::Bus)?;
        Ok(buf)
    }
}

impl<I2C: I2cBus, D: DelayNs> PhasedTransport for Bmp180<I2C, D> {
    fn init(&mut self) -> Result<(), TransportError> {
        self.initialized = false;

        let mut id = [0u8];
        self.i2c
            .read_registers(ADDRESS, reg::CHIP_ID, &mut id)
            .map_err(|_| TransportError::NotResponding)?;
        if id[0] != CHIP_ID {
            return Err(TransportError::BadChipId);
        }

        let mut eeprom = [0u8; 22];
        self.i2c
            .read_registers(ADDRESS, reg::CALIBRATION, &mut eeprom)
            .map_err(|_| TransportError::Bus)?;
        self.calibration = Calibration::from_bytes(&eeprom).ok_or(TransportError::InvalidData)?;

        self.initialized = true;
        Ok(())
    }

    fn start_temperature(&mut self) -> Result<u8, TransportError> {
        self.start(cmd::TEMPERATURE)?;
        Ok(TEMPERATURE_WAIT_MS)
    }

    /// Temperature in °C
    ///
    /// Not truncated to 0.1 °C, so the pressure fetch can recover B5 exactly.
    fn get_temperature(&mut self) -> Result<f32, TransportError> {
        let raw = self.fetch::<2>()?;
        if raw == [0xFF; 2] {
            return Err(TransportError::InvalidData);
        }
        let ut = i32::from(u16::from_be_bytes(raw));
        let b5 = self.calibration.b5(ut).ok_or(TransportError::InvalidData)?;
        Ok((b5 + 8) as f32 / 160.0)
    }

    fn start_pressure(&mut self, oversampling: u8) -> Result<u8, TransportError> {
        let oss = oversampling.min(3);
        self.start(cmd::PRESSURE | (oss << 6))?;
        self.oversampling = oss;
        Ok(PRESSURE_WAIT_MS[usize::from(oss)])
    }

    /// Pressure in Pa
    fn get_pressure(&mut self, temperature: f32) -> Result<f32, TransportError> {
        if !self.initialized {
            return Err(TransportError::NotResponding);
        }
        self.wait_ready()?;

        let raw = self.fetch::<3>()?;
        if raw == [0xFF; 3] {
            return Err(TransportError::InvalidData);
        }
        let up = ((i32::from(raw[0]) << 16) | (i32::from(raw[1]) << 8) | i32::from(raw[2]))
            >> (8 - self.oversampling);

        // Inverse of get_temperature, rounded to the nearest integer
        let scaled = temperature * 160.0 - 8.0;
        let b5 = if scaled >= 0.0 {
            (scaled + 0.5) as i32
        } else {
            (scaled - 0.5) as i32
        };

        self.calibration
            .pressure(up, b5, self.oversampling)
            .map(|pa| pa as f32)
            .ok_or(TransportError::InvalidData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockI2c};

    /// Calibration words from the datasheet example
    const DATASHEET_EEPROM: [u8; 22] = [
        0x01, 0x98, // AC1 = 408
        0xFF, 0xB8, // AC2 = -72
        0xC7, 0xD1, // AC3 = -14383
        0x7F, 0xE5, // AC4 = 32741
        0x7F, 0xF5, // AC5 = 32757
        0x5A, 0x71, // AC6 = 23153
        0x18, 0x2E, // B1 = 6190
        0x00, 0x04, // B2 = 4
        0x80, 0x00, // MB = -32768
        0xDD, 0xF9, // MC = -8711
        0x0B, 0x34, // MD = 2868
    ];

    /// Completes conversions instantly: UT = 27898, UP = 23843 (oss 0)
    fn instant_conversion(registers: &mut [u8; 256], register: u8, value: u8) {
        if register != reg::CONTROL {
            return;
        }
        registers[reg::CONTROL as usize] = value & !SCO;
        let result = reg::RESULT as usize;
        if value == cmd::TEMPERATURE {
            registers[result..result + 2].copy_from_slice(&27898u16.to_be_bytes());
        } else {
            registers[result..result + 3].copy_from_slice(&[0x5D, 0x23, 0x00]);
        }
    }

    fn device() -> MockI2c {
        let mut i2c = MockI2c::new(ADDRESS);
        i2c.set(reg::CHIP_ID, &[CHIP_ID]);
        i2c.set(reg::CALIBRATION, &DATASHEET_EEPROM);
        i2c.on_write = Some(instant_conversion);
        i2c
    }

    fn sensor() -> Bmp180<MockI2c, MockDelay> {
        let mut bmp = Bmp180::new(device(), MockDelay::default());
        bmp.init().unwrap();
        bmp
    }

    #[test]
    fn test_datasheet_example() {
        let mut bmp = sensor();

        assert_eq!(bmp.start_temperature(), Ok(5));
        let t = bmp.get_temperature().unwrap();
        assert!((t - 15.0).abs() < 0.1, "t = {}", t);

        assert_eq!(bmp.start_pressure(0), Ok(5));
        assert_eq!(bmp.get_pressure(t), Ok(69964.0));
    }

    #[test]
    fn test_pressure_waits_by_oversampling() {
        let mut bmp = sensor();
        assert_eq!(bmp.start_pressure(1), Ok(8));
        assert_eq!(bmp.start_pressure(2), Ok(14));
        assert_eq!(bmp.start_pressure(3), Ok(26));
        // Clamped
        assert_eq!(bmp.start_pressure(7), Ok(26));

        let (i2c, _) = bmp.release();
        assert_eq!(i2c.writes.last().unwrap().as_slice(), &[0xF4, 0xF4]);
    }

    #[test]
    fn test_conversion_timeout() {
        let mut bmp = sensor();
        bmp.i2c.on_write = None;

        bmp.start_pressure(0).unwrap();
        assert_eq!(bmp.get_pressure(15.0), Err(TransportError::NotResponding));
        assert_eq!(bmp.delay.total_ns, u64::from(POLL_LIMIT) * 1_000_000);
    }

    #[test]
    fn test_blank_eeprom_rejected() {
        let mut i2c = device();
        i2c.set(reg::CALIBRATION, &[0xFF; 22]);
        let mut bmp = Bmp180::new(i2c, MockDelay::default());
        assert_eq!(bmp.init(), Err(TransportError::InvalidData));
    }

    #[test]
    fn test_wrong_chip_id() {
        let mut i2c = device();
        i2c.set(reg::CHIP_ID, &[0x58]);
        let mut bmp = Bmp180::new(i2c, MockDelay::default());
        assert_eq!(bmp.init(), Err(TransportError::BadChipId));
    }

    #[test]
    fn test_start_before_init() {
        let mut bmp = Bmp180::new(device(), MockDelay::default());
        assert_eq!(bmp.start_temperature(), Err(TransportError::NotResponding));
    }

    /// Leaves every conversion result register reading all ones
    fn stuck_result(registers: &mut [u8; 256], register: u8, value: u8) {
        if register != reg::CONTROL {
            return;
        }
        registers[reg::CONTROL as usize] = value & !SCO;
        let result = reg::RESULT as usize;
        registers[result..result + 3].fill(0xFF);
    }

    #[test]
    fn test_all_ones_result_rejected() {
        let mut bmp = sensor();
        bmp.i2c.on_write = Some(stuck_result);

        bmp.start_temperature().unwrap();
        assert_eq!(bmp.get_temperature(), Err(TransportError::InvalidData));

        bmp.start_pressure(3).unwrap();
        assert_eq!(bmp.get_pressure(15.0), Err(TransportError::InvalidData));
    }

    #[test]
    fn test_out_of_range_temperature_does_not_overflow() {
        let mut bmp = sensor();

        bmp.start_pressure(0).unwrap();
        assert_eq!(bmp.get_pressure(1.0e9), Err(TransportError::InvalidData));

        bmp.start_pressure(0).unwrap();
        assert_eq!(bmp.get_pressure(-1.0e9), Err(TransportError::InvalidData));
    }

    #[test]
    fn test_extreme_raw_temperature() {
        let cal = Calibration::from_bytes(&DATASHEET_EEPROM).unwrap();
        assert!(cal.b5(0).is_some());
        assert!(cal.b5(0xFFFE).is_some());
    }
}
