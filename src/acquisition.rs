//! # Sensor Acquisition Engine
//!
//! Produces exactly one [`AcquisitionOutcome`] per run from a pin number.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──resolve pin──▶ Attempting ──valid sample──────────▶ Validated
//!   │                     │  ▲
//!   │ unsupported         │  └── Retrying ◀── bad / missing sample, transient fault
//!   ▼                     │                   (failures < max_attempts)
//! Failure                 ├── failures == max_attempts ───▶ Exhausted
//!                         ├── GPIO unavailable ───────────▶ HardwareAbsent
//!                         └── any other fault ────────────▶ Aborted
//! ```
//!
//! Every transition out of `Attempting` is computed by
//! [`AcquisitionState::after_attempt`], a pure function, so the retry bound is
//! one testable boundary rather than a branch buried in a loop.
//!
//! ## Simulation Fallback
//! When the GPIO peripheral cannot be used at all, the engine returns a
//! [`AcquisitionOutcome::SimulatedSuccess`] with a plausible random reading.
//! Simulated values are drawn from a range strictly inside the validation
//! range and are not run through [`Reading::validated`].
//!
//! ## Resource Handling
//! The sensor handle is held by a [`SensorSession`] local to
//! [`AcquisitionEngine::acquire`]; it is closed when that function returns,
//! on every path.

use crate::pins::{BusHandle, PinMap};
use crate::sensor::{RawSample, SensorDriver, SensorFault, SensorSession};
use crate::timing::Sleep;
use crate::Reading;
use rand::Rng;
use std::fmt;
use std::ops::Range;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Simulated temperatures are drawn from this range (°C).
pub const SIMULATED_TEMPERATURE_C: Range<f64> = 18.0..26.0;

/// Simulated humidity is drawn from this range (%).
pub const SIMULATED_HUMIDITY_PCT: Range<f64> = 40.0..70.0;

/// Terminal acquisition failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// The requested GPIO number is not wired for the sensor
    #[error("unsupported pin: GPIO {0}")]
    UnsupportedPin(i32),

    /// Every allowed attempt failed
    #[error("timeout after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The build has no sensor driver
    #[error("sensor driver unavailable: {0}")]
    DriverMissing(String),

    /// The driver failed in a way that retrying will not fix
    #[error("unexpected sensor error: {0}")]
    Unexpected(String),
}

/// Why a simulated reading was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationReason {
    /// GPIO access failed (permissions, line claim)
    GpioError,
}

impl SimulationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GpioError => "GPIO_ERROR",
        }
    }
}

impl fmt::Display for SimulationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one acquisition run.
#[derive(Clone, Debug, PartialEq)]
pub enum AcquisitionOutcome {
    /// A validated reading from the sensor
    Success(Reading),
    /// A generated reading, returned because the hardware path is unusable
    SimulatedSuccess {
        reading: Reading,
        reason: SimulationReason,
        /// The hardware error that triggered the simulation
        detail: String,
    },
    Failure(AcquisitionError),
}

impl AcquisitionOutcome {
    /// The reading, real or simulated.
    pub fn reading(&self) -> Option<Reading> {
        match self {
            Self::Success(reading) | Self::SimulatedSuccess { reading, .. } => Some(*reading),
            Self::Failure(_) => None,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::SimulatedSuccess { .. })
    }
}

/// Retry bound and backoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquisitionPolicy {
    /// Total number of sensor reads before giving up (at least 1)
    pub max_attempts: u32,
    /// Constant delay between two consecutive reads
    pub retry_delay: Duration,
}

impl Default for AcquisitionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl AcquisitionPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }
}

/// Acquisition state. `failures` counts failed reads so far on `bus`.
#[derive(Clone, Debug, PartialEq)]
pub enum AcquisitionState {
    Idle,
    Attempting { bus: BusHandle, failures: u32 },
    Retrying { bus: BusHandle, failures: u32 },
    Validated(Reading),
    Exhausted { attempts: u32 },
    HardwareAbsent { detail: String },
    Aborted(AcquisitionError),
}

impl AcquisitionState {
    /// Next state after one read attempt made with `failures` earlier failures.
    pub fn after_attempt(
        bus: BusHandle,
        failures: u32,
        result: Result<RawSample, SensorFault>,
        policy: &AcquisitionPolicy,
    ) -> Self {
        match result {
            Ok(RawSample {
                temperature: Some(temperature),
                humidity: Some(humidity),
            }) => match Reading::validated(temperature, humidity) {
                Some(reading) => Self::Validated(reading),
                None => Self::after_failure(bus, failures, policy),
            },
            Ok(_) | Err(SensorFault::Transient(_)) => Self::after_failure(bus, failures, policy),
            Err(SensorFault::HardwareUnavailable(detail)) => Self::HardwareAbsent { detail },
            Err(SensorFault::DriverMissing(detail)) => {
                Self::Aborted(AcquisitionError::DriverMissing(detail))
            }
            Err(SensorFault::Other(detail)) => Self::Aborted(AcquisitionError::Unexpected(detail)),
        }
    }

    /// The retry bound: the `max_attempts`-th failure exhausts the run.
    pub fn after_failure(bus: BusHandle, failures: u32, policy: &AcquisitionPolicy) -> Self {
        let failures = failures + 1;
        if failures >= policy.max_attempts {
            Self::Exhausted { attempts: failures }
        } else {
            Self::Retrying { bus, failures }
        }
    }
}

/// Draw a simulated reading, uniform over the one-decimal grid of the
/// simulation ranges.
pub fn simulated_reading<R: Rng + ?Sized>(rng: &mut R) -> Reading {
    Reading {
        temperature: uniform_tenths(rng, &SIMULATED_TEMPERATURE_C),
        humidity: uniform_tenths(rng, &SIMULATED_HUMIDITY_PCT),
    }
}

fn uniform_tenths<R: Rng + ?Sized>(rng: &mut R, range: &Range<f64>) -> f64 {
    let low = (range.start * 10.0).round() as i32;
    let high = (range.end * 10.0).round() as i32;
    f64::from(rng.gen_range(low..high)) / 10.0
}

/// Drives one sensor read from pin resolution to outcome.
pub struct AcquisitionEngine<P, D, S, R> {
    pins: P,
    driver: D,
    sleeper: S,
    rng: R,
    policy: AcquisitionPolicy,
}

impl<P, D, S, R> AcquisitionEngine<P, D, S, R>
where
    P: PinMap,
    D: SensorDriver,
    S: Sleep,
    R: Rng,
{
    pub fn new(pins: P, driver: D, sleeper: S, rng: R) -> Self {
        Self {
            pins,
            driver,
            sleeper,
            rng,
            policy: AcquisitionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AcquisitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &AcquisitionPolicy {
        &self.policy
    }

    /// Read the sensor on `pin`.
    pub fn acquire(&mut self, pin: i32) -> AcquisitionOutcome {
        let mut session: Option<SensorSession<D::Handle>> = None;
        let mut state = AcquisitionState::Idle;

        loop {
            state = match state {
                AcquisitionState::Idle => match self.pins.resolve(pin) {
                    Some(bus) => {
                        debug!(pin, line = bus.line, "resolved sensor pin");
                        AcquisitionState::Attempting { bus, failures: 0 }
                    }
                    None => {
                        warn!(pin, "unsupported GPIO pin");
                        AcquisitionState::Aborted(AcquisitionError::UnsupportedPin(pin))
                    }
                },
                AcquisitionState::Attempting { bus, failures } => {
                    let result = self.read_once(bus, &mut session);
                    if let Err(fault) = &result {
                        debug!(attempt = failures + 1, error = %fault, "sensor read failed");
                    }
                    AcquisitionState::after_attempt(bus, failures, result, &self.policy)
                }
                AcquisitionState::Retrying { bus, failures } => {
                    info!(
                        failures,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = self.policy.retry_delay.as_millis() as u64,
                        "retrying sensor read"
                    );
                    self.sleeper.sleep(self.policy.retry_delay);
                    AcquisitionState::Attempting { bus, failures }
                }
                AcquisitionState::Validated(reading) => {
                    info!(
                        temperature = reading.temperature,
                        humidity = reading.humidity,
                        "sensor reading validated"
                    );
                    return AcquisitionOutcome::Success(reading);
                }
                AcquisitionState::Exhausted { attempts } => {
                    warn!(attempts, "sensor read attempts exhausted");
                    return AcquisitionOutcome::Failure(AcquisitionError::Timeout { attempts });
                }
                AcquisitionState::HardwareAbsent { detail } => {
                    warn!(error = %detail, "GPIO unavailable, using simulated reading");
                    return AcquisitionOutcome::SimulatedSuccess {
                        reading: simulated_reading(&mut self.rng),
                        reason: SimulationReason::GpioError,
                        detail,
                    };
                }
                AcquisitionState::Aborted(error) => {
                    warn!(error = %error, "sensor acquisition failed");
                    return AcquisitionOutcome::Failure(error);
                }
            };
        }
    }

    /// One read, opening the session first if this is the first attempt or a
    /// previous open failed.
    fn read_once(
        &mut self,
        bus: BusHandle,
        session: &mut Option<SensorSession<D::Handle>>,
    ) -> Result<RawSample, SensorFault> {
        if let Some(open) = session.as_mut() {
            return open.read();
        }
        session
            .insert(SensorSession::open(&mut self.driver, bus)?)
            .read()
    }
}
