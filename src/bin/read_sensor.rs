//! # DHT11 Sensor Tool
//!
//! Reads the lab's DHT11 once and prints a single result line on stdout.
//!
//! ```bash
//! read-sensor              # GPIO 4, CSV   -> 22.3,55.0
//! read-sensor 17 json      # GPIO 17, JSON -> {"temperature":22.3,"humidity":55.0}
//! RUST_LOG=debug read-sensor
//! ```
//!
//! Failures print `ERROR,ERROR` (or `{"error": ...}`) and still exit 0, so the
//! aggregation scripts can skip the node. Only malformed arguments exit 1.

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use lab_weather_lib::acquisition::{AcquisitionEngine, AcquisitionPolicy};
use lab_weather_lib::config::Config;
use lab_weather_lib::logging;
use lab_weather_lib::pins::{gpio_to_header_pin, BoardPinMap};
use lab_weather_lib::report::{format_outcome, OutputFormat};
use lab_weather_lib::sensor::SensorDriver;
use lab_weather_lib::timing::ThreadSleep;
use std::io::{self, Write};
use tracing::info;

/// Read temperature and humidity from a DHT11
#[derive(Parser, Debug)]
#[command(name = "read-sensor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// BCM GPIO number of the sensor data line [default: config, then 4]
    #[arg(allow_negative_numbers = true)]
    pin: Option<i32>,

    /// Result line format
    #[arg(value_enum, ignore_case = true)]
    format: Option<OutputFormat>,
}

/// Exit status for a rejected command line. Help and version are not errors.
fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn parse_args() -> Args {
    Args::try_parse().unwrap_or_else(|err| {
        let code = exit_code(&err);
        let _ = err.print();
        std::process::exit(code)
    })
}

/// Run one acquisition on `pin` and render its result line.
fn result_line<D: SensorDriver>(
    driver: D,
    pin: i32,
    format: OutputFormat,
    policy: AcquisitionPolicy,
) -> String {
    let mut engine = AcquisitionEngine::new(BoardPinMap, driver, ThreadSleep, rand::thread_rng())
        .with_policy(policy);
    format_outcome(&engine.acquire(pin), format)
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn sensor_driver() -> lab_weather_lib::dht11::Dht11Driver {
    lab_weather_lib::dht11::Dht11Driver
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn sensor_driver() -> lab_weather_lib::sensor::MissingDriver {
    lab_weather_lib::sensor::MissingDriver
}

fn main() -> Result<()> {
    let args = parse_args();
    logging::init("info");

    let config = Config::load();
    let pin = args.pin.unwrap_or(config.sensor.default_pin);
    let format = args.format.unwrap_or_default();

    info!(
        header_pin = ?u8::try_from(pin).ok().and_then(gpio_to_header_pin),
        "reading DHT11 on GPIO {pin}"
    );

    let line = result_line(sensor_driver(), pin, format, config.sensor.policy());

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("writing result line")?;
    Ok(())
}
