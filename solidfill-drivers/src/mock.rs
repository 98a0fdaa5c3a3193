//! Test doubles for bus, pins and delays

use std::vec::Vec;

use solidfill_hal::{I2cBus, OutputPin};

/// Output pin remembering its level
pub struct MockPin {
    high: bool,
}

impl MockPin {
    pub fn low() -> Self {
        Self { high: false }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Hook run after each register write, emulating device side effects
pub type WriteHook = fn(&mut [u8; 256], u8, u8);

/// Register-file device on an I2C bus
///
/// Writes set the register pointer from the first byte and store the rest
/// at consecutive registers. Reads return consecutive registers from the
/// pointer.
pub struct MockI2c {
    pub address: u8,
    pub registers: [u8; 256],
    pub writes: Vec<Vec<u8>>,
    pub fail: bool,
    pub on_write: Option<WriteHook>,
    pointer: u8,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            writes: Vec::new(),
            fail: false,
            on_write: None,
            pointer: 0,
        }
    }

    pub fn set(&mut self, register: u8, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.registers[register as usize + i] = *b;
        }
    }

    fn check(&self, address: u8) -> Result<(), ()> {
        if self.fail || address != self.address {
            Err(())
        } else {
            Ok(())
        }
    }

    fn fill(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.registers[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl I2cBus for MockI2c {
    type Error = ();

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        self.check(address)?;
        self.writes.push(data.to_vec());

        if let Some((&register, values)) = data.split_first() {
            self.pointer = register;
            for (i, &value) in values.iter().enumerate() {
                let reg = register.wrapping_add(i as u8);
                self.registers[reg as usize] = value;
                if let Some(hook) = self.on_write {
                    hook(&mut self.registers, reg, value);
                }
            }
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ()> {
        self.check(address)?;
        self.fill(buf);
        Ok(())
    }

    fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), ()> {
        self.check(address)?;
        if let Some(&register) = write.first() {
            self.pointer = register;
        }
        self.fill(read);
        Ok(())
    }
}

/// Delay that only counts
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
