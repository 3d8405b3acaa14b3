//! LCD1602 Driver
//!
//! HD44780-compatible 16x2 character LCD behind a PCF8574 I2C backpack, the
//! module wired on the lab boards (address 0x27, bus 1). The controller runs
//! in 4-bit mode: every byte is sent as two nibbles on P4-P7 of the expander,
//! latched by pulsing the enable line.
//!
//! The driver is generic over [`I2cBus`] and [`Sleep`] so the command stream
//! can be checked without hardware; the Raspberry Pi bus lives in `hw_i2c`.

use crate::display::{DisplayError, DisplaySurface, LCD_COLUMNS, LCD_ROWS};
use crate::timing::Sleep;
use std::time::Duration;
use tracing::debug;

// PCF8574 pin mapping on the backpack
const RS: u8 = 0x01;
const ENABLE: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 instructions
const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON: u8 = 0x0C;
const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const SET_DDRAM_ADDR: u8 = 0x80;

/// DDRAM address of the first cell of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Degree sign in the A00 character ROM
const DEGREE_GLYPH: u8 = 0xDF;

/// Trait for the byte-wide I2C link to the expander
pub trait I2cBus {
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError>;
}

/// Opens an [`I2cBus`] to a device
pub trait I2cConnector {
    type Bus: I2cBus;

    fn connect(&mut self, address: u8, bus: u8) -> Result<Self::Bus, DisplayError>;
}

/// Map a character to the controller's ROM. Unknown glyphs show as '?'.
pub fn encode_char(c: char) -> u8 {
    match c {
        '°' => DEGREE_GLYPH,
        ' '..='}' => c as u8,
        _ => b'?',
    }
}

/// HD44780 over PCF8574 driver
pub struct Lcd1602<B, S> {
    bus: B,
    sleeper: S,
}

impl<B: I2cBus, S: Sleep> Lcd1602<B, S> {
    /// Run the 4-bit initialisation sequence and leave the display cleared,
    /// on, cursor hidden, backlight lit.
    pub fn init(bus: B, sleeper: S) -> Result<Self, DisplayError> {
        let mut lcd = Self { bus, sleeper };
        lcd.power_up()
            .map_err(|e| DisplayError::Init(e.to_string()))?;
        Ok(lcd)
    }

    fn power_up(&mut self) -> Result<(), DisplayError> {
        self.sleeper.sleep(Duration::from_millis(50));
        self.expander_write(0)?;

        // Three times 8-bit mode, then 4-bit (HD44780 datasheet, figure 24)
        self.write_nibble(0x30)?;
        self.sleeper.sleep(Duration::from_millis(5));
        self.write_nibble(0x30)?;
        self.sleeper.sleep(Duration::from_millis(5));
        self.write_nibble(0x30)?;
        self.sleeper.sleep(Duration::from_micros(150));
        self.write_nibble(0x20)?;

        self.command(FUNCTION_SET_4BIT_2LINE)?;
        self.command(DISPLAY_ON)?;
        self.clear()?;
        self.command(ENTRY_MODE_INCREMENT)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CLEAR_DISPLAY)?;
        self.sleeper.sleep(Duration::from_millis(2));
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let offset = ROW_OFFSETS
            .get(usize::from(row))
            .ok_or(DisplayError::OutOfRange { col, row })?;
        if usize::from(col) >= LCD_COLUMNS {
            return Err(DisplayError::OutOfRange { col, row });
        }
        self.command(SET_DDRAM_ADDR | (offset + col))
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for c in text.chars() {
            self.send(encode_char(c), RS)?;
        }
        Ok(())
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, 0)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble((value & 0xF0) | mode)?;
        self.write_nibble(((value << 4) & 0xF0) | mode)
    }

    fn write_nibble(&mut self, data: u8) -> Result<(), DisplayError> {
        self.expander_write(data | ENABLE)?;
        self.sleeper.sleep(Duration::from_micros(1));
        self.expander_write(data & !ENABLE)?;
        self.sleeper.sleep(Duration::from_micros(50));
        Ok(())
    }

    fn expander_write(&mut self, data: u8) -> Result<(), DisplayError> {
        self.bus.write_byte(data | BACKLIGHT)
    }
}

/// [`DisplaySurface`] backed by an LCD1602 reached through `C`.
///
/// The bus is opened by `init` and closed when the surface is dropped.
pub struct LcdSurface<C: I2cConnector, S> {
    connector: C,
    sleeper: S,
    lcd: Option<Lcd1602<C::Bus, S>>,
}

impl<C: I2cConnector, S: Sleep + Clone> LcdSurface<C, S> {
    pub fn new(connector: C, sleeper: S) -> Self {
        Self {
            connector,
            sleeper,
            lcd: None,
        }
    }

    fn lcd(&mut self) -> Result<&mut Lcd1602<C::Bus, S>, DisplayError> {
        self.lcd
            .as_mut()
            .ok_or_else(|| DisplayError::Init("display not initialised".to_string()))
    }
}

impl<C: I2cConnector, S: Sleep + Clone> DisplaySurface for LcdSurface<C, S> {
    fn init(&mut self, address: u8, bus: u8) -> Result<(), DisplayError> {
        debug!(address = format_args!("{address:#04x}"), bus, "initialising LCD1602");
        let link = self
            .connector
            .connect(address, bus)
            .map_err(|e| DisplayError::Init(e.to_string()))?;
        self.lcd = Some(Lcd1602::init(link, self.sleeper.clone())?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lcd()?.clear()
    }

    fn write_line(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        if row >= LCD_ROWS {
            return Err(DisplayError::OutOfRange { col, row });
        }
        let room = LCD_COLUMNS.saturating_sub(usize::from(col));
        let visible: String = text.chars().take(room).collect();
        let lcd = self.lcd()?;
        lcd.set_cursor(col, row)?;
        lcd.write_str(&visible)
    }
}
