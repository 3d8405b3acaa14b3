// src/hw_i2c.rs
use crate::display::DisplayError;
use crate::lcd1602::{I2cBus, I2cConnector};
use rppal::i2c::I2c;

/// Kernel I2C device (/dev/i2c-N) addressed at the LCD backpack
pub struct RppalI2c {
    dev: I2c,
}

impl I2cBus for RppalI2c {
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.dev
            .write(&[byte])
            .map(|_| ())
            .map_err(|e| DisplayError::Io(e.to_string()))
    }
}

/// Opens /dev/i2c-N through rppal
#[derive(Clone, Copy, Debug, Default)]
pub struct RppalConnector;

impl I2cConnector for RppalConnector {
    type Bus = RppalI2c;

    fn connect(&mut self, address: u8, bus: u8) -> Result<RppalI2c, DisplayError> {
        let mut dev = I2c::with_bus(bus).map_err(|e| DisplayError::Init(e.to_string()))?;
        dev.set_slave_address(u16::from(address))
            .map_err(|e| DisplayError::Init(e.to_string()))?;
        Ok(RppalI2c { dev })
    }
}
