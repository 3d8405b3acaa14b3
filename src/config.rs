//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! lab-weather.toml file. Every field has a default matching the lab wiring,
//! so the file is optional and a broken file never stops a run.

use crate::acquisition::AcquisitionPolicy;
use crate::display::SurfaceAddress;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "lab-weather.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_ENV: &str = "LAB_WEATHER_CONFIG";

/// Application configuration loaded from lab-weather.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// DHT11 acquisition settings
    pub sensor: SensorConfig,
    /// LCD1602 settings
    pub display: DisplayConfig,
}

/// DHT11 acquisition settings
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorConfig {
    /// BCM GPIO line used when the sensor tool gets no pin argument
    pub default_pin: i32,
    /// Total read attempts before reporting a timeout
    pub max_attempts: u32,
    /// Constant delay between attempts; the DHT11 needs ~2 s between samples
    pub retry_delay_secs: u64,
}

/// LCD1602 settings
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// I2C address of the PCF8574 backpack
    pub i2c_address: u8,
    /// I2C bus number (/dev/i2c-N)
    pub i2c_bus: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            default_pin: 4, // GPIO 4, header pin 7
            max_attempts: 5,
            retry_delay_secs: 2,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            i2c_address: 0x27,
            i2c_bus: 1,
        }
    }
}

impl SensorConfig {
    pub fn policy(&self) -> AcquisitionPolicy {
        AcquisitionPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.retry_delay_secs),
        )
    }
}

impl DisplayConfig {
    pub fn surface_address(&self) -> SurfaceAddress {
        SurfaceAddress {
            address: self.i2c_address,
            bus: self.i2c_bus,
        }
    }
}

impl Config {
    /// Load configuration from `$LAB_WEATHER_CONFIG` or lab-weather.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }
}
