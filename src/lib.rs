//! # Lab Weather Core Library
//!
//! Shared types and components behind the two command-line tools used in the
//! classroom IoT lab:
//! - `read-sensor` reads a DHT11 temperature/humidity sensor on a GPIO line and
//!   prints one CSV or JSON result line
//! - `lcd-display` renders already-aggregated values (one node's reading, or
//!   min/max/avg across the class) on a 2×16 character LCD
//!
//! ## Design Philosophy
//!
//! ### One-Shot Invocations
//! Each tool run does one thing and exits. There is no daemon, no shared state
//! and no persistence; the only way the two tools talk is through the values a
//! caller passes between them on the command line.
//!
//! ### Never Starve the Pipeline
//! - **Sensor glitches** are retried a bounded number of times with a constant
//!   backoff, then reported as a timeout
//! - **Missing GPIO access** (no permission, line already claimed) yields a
//!   clearly tagged simulated reading so the lab exercise can continue
//! - **Display faults** are logged and reported as `false`, never as a crash
//!
//! ### Data Flow
//! 1. **Acquire**: [`acquisition::AcquisitionEngine`] resolves the pin, drives
//!    the sensor and produces an [`acquisition::AcquisitionOutcome`]
//! 2. **Report**: [`report`] turns the outcome into the CSV or JSON line
//! 3. **Lay out**: [`layout`] maps a display mode and its values to a
//!    [`display::DisplayPlan`]
//! 4. **Render**: [`display::Renderer`] pushes the plan to a
//!    [`display::DisplaySurface`]
//!
//! ## Core Types
//! - [`Reading`]: a validated temperature/humidity pair

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

// Module declarations
pub mod acquisition;
pub mod config;
pub mod display;
pub mod layout;
pub mod lcd1602;
pub mod logging;
pub mod pins;
pub mod report;
pub mod sensor;
pub mod terminal;
pub mod timing;

#[cfg(all(target_os = "linux", feature = "hardware"))]
pub mod dht11;
#[cfg(all(target_os = "linux", feature = "hardware"))]
pub mod hw_i2c;

#[cfg(test)]
mod tests;

/// Temperatures outside this range (°C) are treated as a bad read.
pub const VALID_TEMPERATURE_C: RangeInclusive<f64> = -40.0..=80.0;

/// Relative humidity outside this range (%) is treated as a bad read.
pub const VALID_HUMIDITY_PCT: RangeInclusive<f64> = 0.0..=100.0;

/// A temperature/humidity pair, rounded to one decimal place.
///
/// Readings coming from the sensor are only built through
/// [`Reading::validated`], which enforces [`VALID_TEMPERATURE_C`] and
/// [`VALID_HUMIDITY_PCT`]. Simulated readings are generated inside a narrower
/// range and are built directly.
///
/// # Example
/// ```
/// use lab_weather_lib::Reading;
///
/// let reading = Reading::validated(22.34, 55.0).unwrap();
/// assert_eq!(reading, Reading { temperature: 22.3, humidity: 55.0 });
///
/// assert!(Reading::validated(95.0, 55.0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

impl Reading {
    /// Build a reading from sensor values, or `None` if either value is
    /// outside the physical range of the sensor.
    pub fn validated(temperature: f64, humidity: f64) -> Option<Self> {
        if VALID_TEMPERATURE_C.contains(&temperature) && VALID_HUMIDITY_PCT.contains(&humidity) {
            Some(Self {
                temperature: round_tenth(temperature),
                humidity: round_tenth(humidity),
            })
        } else {
            None
        }
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod reading_tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(Reading::validated(-40.0, 0.0).is_some());
        assert!(Reading::validated(80.0, 100.0).is_some());
        assert!(Reading::validated(-40.1, 50.0).is_none());
        assert!(Reading::validated(20.0, 100.1).is_none());
    }

    #[test]
    fn nan_is_never_valid() {
        assert!(Reading::validated(f64::NAN, 50.0).is_none());
        assert!(Reading::validated(20.0, f64::NAN).is_none());
    }

    #[test]
    fn round_tenth_keeps_one_decimal() {
        assert_eq!(round_tenth(22.34), 22.3);
        assert_eq!(round_tenth(22.36), 22.4);
        assert_eq!(round_tenth(-3.04), -3.0);
    }
}
