//! # Sensor Driver Contract
//!
//! The acquisition engine talks to the humidity sensor only through the
//! [`SensorDriver`] and [`SensorHandle`] traits defined here. The concrete
//! DHT11 binding lives in `dht11` and is compiled only with the `hardware`
//! feature on Linux; builds without it use [`MissingDriver`].
//!
//! ## Fault Classification
//!
//! Every driver error is reported as a [`SensorFault`], and the variant decides
//! what the engine does next:
//! - [`SensorFault::Transient`]: momentary glitch, the attempt is retried
//! - [`SensorFault::HardwareUnavailable`]: GPIO peripheral or line cannot be
//!   claimed, the engine switches to simulated data
//! - [`SensorFault::DriverMissing`]: no sensor library in this build, terminal
//! - [`SensorFault::Other`]: anything else, terminal
//!
//! ## Handle Lifetime
//!
//! Opened handles are wrapped in a [`SensorSession`], whose `Drop` is the
//! single place a handle is closed.

use crate::pins::BusHandle;
use thiserror::Error;

/// Errors a sensor driver can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorFault {
    /// Read failed this time but may succeed on the next attempt
    #[error("transient sensor fault: {0}")]
    Transient(String),

    /// The GPIO bus or line cannot be used (permissions, line already claimed)
    #[error("GPIO unavailable: {0}")]
    HardwareUnavailable(String),

    /// This build has no sensor driver compiled in
    #[error("sensor driver unavailable: {0}")]
    DriverMissing(String),

    /// Any other driver error
    #[error("{0}")]
    Other(String),
}

/// One raw sample as returned by the driver, before range validation.
///
/// Either value may be missing when the sensor returns a partial frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawSample {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl RawSample {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
        }
    }
}

/// An opened sensor.
pub trait SensorHandle {
    /// Request one sample from the sensor.
    fn read(&mut self) -> Result<RawSample, SensorFault>;

    /// Release the underlying GPIO line. Called exactly once per handle.
    fn close(&mut self);
}

/// Opens sensor handles on resolved GPIO lines.
pub trait SensorDriver {
    type Handle: SensorHandle;

    fn open(&mut self, bus: BusHandle) -> Result<Self::Handle, SensorFault>;
}

/// Scoped ownership of an open sensor handle.
///
/// The handle is closed when the session is dropped, whatever path the
/// acquisition took to get there.
pub struct SensorSession<H: SensorHandle> {
    handle: H,
}

impl<H: SensorHandle> SensorSession<H> {
    pub fn open<D>(driver: &mut D, bus: BusHandle) -> Result<Self, SensorFault>
    where
        D: SensorDriver<Handle = H>,
    {
        let handle = driver.open(bus)?;
        Ok(Self { handle })
    }

    pub fn read(&mut self) -> Result<RawSample, SensorFault> {
        self.handle.read()
    }
}

impl<H: SensorHandle> Drop for SensorSession<H> {
    fn drop(&mut self) {
        self.handle.close();
    }
}

/// Driver used when the crate is built without sensor support.
#[derive(Clone, Copy, Debug, Default)]
pub struct MissingDriver;

/// Never constructed; [`MissingDriver::open`] always fails.
#[derive(Debug)]
pub struct NoHandle;

impl SensorHandle for NoHandle {
    fn read(&mut self) -> Result<RawSample, SensorFault> {
        Err(SensorFault::DriverMissing("no sensor handle".to_string()))
    }

    fn close(&mut self) {}
}

impl SensorDriver for MissingDriver {
    type Handle = NoHandle;

    fn open(&mut self, _bus: BusHandle) -> Result<NoHandle, SensorFault> {
        Err(SensorFault::DriverMissing(
            "built without the `hardware` feature".to_string(),
        ))
    }
}
