//! DHT11 Driver
//!
//! Bit-banged single-wire protocol on a Raspberry Pi GPIO line through rppal:
//!
//! 1. Host pulls the line low for 18 ms, then releases it
//! 2. Sensor answers with 80 µs low, 80 µs high
//! 3. Sensor sends 40 bits; each bit is 50 µs low followed by a high pulse
//!    of ~27 µs (0) or ~70 µs (1)
//! 4. Frame: humidity int, humidity dec, temperature int, temperature dec,
//!    checksum (low byte of the sum of the first four)
//!
//! Linux scheduling occasionally stretches a pulse past our timeouts; those
//! reads, like checksum mismatches, are reported as transient faults and the
//! acquisition engine simply tries again.

use crate::pins::BusHandle;
use crate::sensor::{RawSample, SensorDriver, SensorFault, SensorHandle};
use rppal::gpio::{Gpio, IoPin, Level, Mode, PullUpDown};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const START_LOW: Duration = Duration::from_millis(18);
const RESPONSE_TIMEOUT: Duration = Duration::from_micros(120);
const BIT_TIMEOUT: Duration = Duration::from_micros(120);
/// High pulses longer than this are a 1 bit
const ONE_THRESHOLD: Duration = Duration::from_micros(45);

/// Opens DHT11 sensors on the Pi's GPIO controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dht11Driver;

pub struct Dht11Handle {
    pin: IoPin,
    line: u8,
}

impl SensorDriver for Dht11Driver {
    type Handle = Dht11Handle;

    fn open(&mut self, bus: BusHandle) -> Result<Dht11Handle, SensorFault> {
        // Any failure here means the GPIO peripheral itself is out of reach
        // (not a Pi, no /dev/gpiomem access, line claimed by another process).
        let gpio = Gpio::new().map_err(|e| SensorFault::HardwareUnavailable(e.to_string()))?;
        let pin = gpio
            .get(bus.line)
            .map_err(|e| SensorFault::HardwareUnavailable(format!("unable to set line {}: {e}", bus.line)))?
            .into_io(Mode::Input);
        debug!(line = bus.line, "DHT11 line claimed");
        Ok(Dht11Handle {
            pin,
            line: bus.line,
        })
    }
}

impl SensorHandle for Dht11Handle {
    fn read(&mut self) -> Result<RawSample, SensorFault> {
        let frame = self.read_frame()?;
        decode_frame(&frame)
    }

    fn close(&mut self) {
        self.pin.set_mode(Mode::Input);
        debug!(line = self.line, "DHT11 line released");
    }
}

impl Dht11Handle {
    fn read_frame(&mut self) -> Result<[u8; 5], SensorFault> {
        self.pin.set_mode(Mode::Output);
        self.pin.set_low();
        thread::sleep(START_LOW);
        self.pin.set_high();
        self.pin.set_mode(Mode::Input);
        self.pin.set_pullupdown(PullUpDown::PullUp);

        self.wait_for(Level::Low, RESPONSE_TIMEOUT)?;
        self.wait_for(Level::High, RESPONSE_TIMEOUT)?;
        self.wait_for(Level::Low, RESPONSE_TIMEOUT)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(Level::High, BIT_TIMEOUT)?;
            let high = self.wait_for(Level::Low, BIT_TIMEOUT)?;
            let byte = &mut frame[bit / 8];
            *byte <<= 1;
            if high > ONE_THRESHOLD {
                *byte |= 1;
            }
        }
        Ok(frame)
    }

    /// Spin until the line reaches `level`; returns how long that took.
    fn wait_for(&self, level: Level, timeout: Duration) -> Result<Duration, SensorFault> {
        let start = Instant::now();
        while self.pin.read() != level {
            if start.elapsed() > timeout {
                return Err(SensorFault::Transient(format!(
                    "timed out waiting for {level:?} on GPIO {}",
                    self.line
                )));
            }
        }
        Ok(start.elapsed())
    }
}

/// Check the checksum and convert a raw frame to a sample.
pub fn decode_frame(frame: &[u8; 5]) -> Result<RawSample, SensorFault> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorFault::Transient(format!(
            "checksum mismatch: expected {:#04x}, got {sum:#04x}",
            frame[4]
        )));
    }

    let humidity = f64::from(frame[0]) + f64::from(frame[1]) / 10.0;
    let mut temperature = f64::from(frame[2]) + f64::from(frame[3] & 0x7F) / 10.0;
    if frame[3] & 0x80 != 0 {
        temperature = -temperature;
    }
    Ok(RawSample::new(temperature, humidity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_valid_frame() {
        let frame = [55, 0, 22, 3, 80];
        assert_eq!(decode_frame(&frame), Ok(RawSample::new(22.3, 55.0)));
    }

    #[test]
    fn sign_bit_makes_temperature_negative() {
        let frame = [40, 0, 2, 0x85, 40u8.wrapping_add(2).wrapping_add(0x85)];
        let sample = decode_frame(&frame).unwrap();
        assert_eq!(sample.temperature, Some(-2.5));
    }

    #[test]
    fn bad_checksum_is_transient() {
        let frame = [55, 0, 22, 3, 81];
        assert!(matches!(decode_frame(&frame), Err(SensorFault::Transient(_))));
    }
}
