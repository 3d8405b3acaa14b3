//! # Scenario Tests
//!
//! End-to-end checks of the acquisition engine and the display renderer
//! against scripted collaborators. Nothing here touches GPIO or I2C, and no
//! test sleeps for the real retry or alternation delays.

mod display_tests;

use crate::display::{DisplayError, DisplaySurface};
use crate::pins::BusHandle;
use crate::sensor::{RawSample, SensorDriver, SensorFault, SensorHandle};
use crate::timing::Sleep;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Records every requested delay.
#[derive(Clone, Default)]
pub(crate) struct RecordingSleep {
    pub naps: Rc<RefCell<Vec<Duration>>>,
}

impl Sleep for RecordingSleep {
    fn sleep(&mut self, duration: Duration) {
        self.naps.borrow_mut().push(duration);
    }
}

impl RecordingSleep {
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.borrow().clone()
    }
}

/// What the scripted driver saw.
#[derive(Debug, Default)]
pub(crate) struct DriverLog {
    pub opened: Vec<BusHandle>,
    pub reads: u32,
    pub closes: u32,
}

/// Sensor driver that replays queued results.
///
/// Open results are consumed first (an empty queue means the open succeeds);
/// read results are consumed per read, and an exhausted read queue keeps
/// returning a transient fault.
#[derive(Default)]
pub(crate) struct ScriptedDriver {
    opens: VecDeque<Result<(), SensorFault>>,
    reads: Rc<RefCell<VecDeque<Result<RawSample, SensorFault>>>>,
    log: Rc<RefCell<DriverLog>>,
}

impl ScriptedDriver {
    pub fn reading(results: impl IntoIterator<Item = Result<RawSample, SensorFault>>) -> Self {
        Self {
            reads: Rc::new(RefCell::new(results.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn failing_open(mut self, fault: SensorFault) -> Self {
        self.opens.push_back(Err(fault));
        self
    }

    pub fn log(&self) -> Rc<RefCell<DriverLog>> {
        Rc::clone(&self.log)
    }
}

pub(crate) struct ScriptedHandle {
    reads: Rc<RefCell<VecDeque<Result<RawSample, SensorFault>>>>,
    log: Rc<RefCell<DriverLog>>,
}

impl SensorDriver for ScriptedDriver {
    type Handle = ScriptedHandle;

    fn open(&mut self, bus: BusHandle) -> Result<ScriptedHandle, SensorFault> {
        self.opens.pop_front().unwrap_or(Ok(()))?;
        self.log.borrow_mut().opened.push(bus);
        Ok(ScriptedHandle {
            reads: Rc::clone(&self.reads),
            log: Rc::clone(&self.log),
        })
    }
}

impl SensorHandle for ScriptedHandle {
    fn read(&mut self) -> Result<RawSample, SensorFault> {
        self.log.borrow_mut().reads += 1;
        self.reads
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(SensorFault::Transient("no response".into())))
    }

    fn close(&mut self) {
        self.log.borrow_mut().closes += 1;
    }
}

/// Calls made on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SurfaceCall {
    Init { address: u8, bus: u8 },
    Clear,
    Write { col: u8, row: u8, text: String },
    Flush,
}

/// Display surface that records calls and can be told to fail init.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub fail_init: bool,
}

impl RecordingSurface {
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    /// The text written per frame, in order, one `Vec` per flush.
    pub fn frames(&self) -> Vec<Vec<(u8, String)>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for call in &self.calls {
            match call {
                SurfaceCall::Write { row, text, .. } => current.push((*row, text.clone())),
                SurfaceCall::Flush => frames.push(std::mem::take(&mut current)),
                _ => {}
            }
        }
        frames
    }
}

impl DisplaySurface for RecordingSurface {
    fn init(&mut self, address: u8, bus: u8) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Init { address, bus });
        if self.fail_init {
            return Err(DisplayError::Init("no ack from 0x27".into()));
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Clear);
        Ok(())
    }

    fn write_line(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Write {
            col,
            row,
            text: text.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Flush);
        Ok(())
    }
}
