//! # Two-Line Display Rendering
//!
//! This module owns what ends up on the 2×16 character LCD: line clipping,
//! the [`DisplayPlan`] for a run, and the timing of the alternating modes.
//! It knows nothing about the display controller; it drives any
//! [`DisplaySurface`] (the LCD1602 over I2C on the Pi, a terminal panel in
//! development).
//!
//! ## Rendering Rules
//! - **Clipping**: every line keeps its first 16 characters. Short lines are
//!   not padded; the surface's clear takes care of leftover cells
//! - **Static plans**: one frame, then return
//! - **Alternating plans**: frame 1, wait half the window, frame 2, wait the
//!   other half. The LCD has no second buffer, so each screen simply owns an
//!   equal share of the window
//!
//! ## Failure Semantics
//! A render never panics and never returns an error. Surface faults are logged
//! and reported as `false` so that the calling tool can exit normally.

use crate::timing::Sleep;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Characters per LCD row
pub const LCD_COLUMNS: usize = 16;

/// Rows on the LCD
pub const LCD_ROWS: u8 = 2;

/// Errors raised by a display surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The controller did not come up
    #[error("LCD init failed: {0}")]
    Init(String),

    /// Bus write failed after initialisation
    #[error("LCD I/O error: {0}")]
    Io(String),

    /// A write outside the 16×2 grid
    #[error("position out of range: col {col}, row {row}")]
    OutOfRange { col: u8, row: u8 },
}

/// Clip a line to the LCD width, counting characters rather than bytes.
pub fn clip_line(text: &str) -> String {
    text.chars().take(LCD_COLUMNS).collect()
}

/// One renderable frame: two lines of at most 16 characters each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenContent {
    line1: String,
    line2: String,
}

impl ScreenContent {
    /// Build a frame, clipping both lines to [`LCD_COLUMNS`].
    pub fn new(line1: impl AsRef<str>, line2: impl AsRef<str>) -> Self {
        Self {
            line1: clip_line(line1.as_ref()),
            line2: clip_line(line2.as_ref()),
        }
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn lines(&self) -> [&str; 2] {
        [&self.line1, &self.line2]
    }
}

/// Everything one display invocation will show.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayPlan {
    /// One frame, shown until the next invocation overwrites it
    Static(ScreenContent),
    /// Two frames sharing `duration` equally
    Alternating {
        first: ScreenContent,
        second: ScreenContent,
        duration: Duration,
    },
}

impl DisplayPlan {
    /// Frames in display order.
    pub fn frames(&self) -> Vec<&ScreenContent> {
        match self {
            Self::Static(frame) => vec![frame],
            Self::Alternating { first, second, .. } => vec![first, second],
        }
    }
}

/// A character display the renderer can draw on.
pub trait DisplaySurface {
    /// Bring up the controller at `address` on I2C bus `bus`.
    fn init(&mut self, address: u8, bus: u8) -> Result<(), DisplayError>;

    /// Blank every cell.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write `text` starting at (`col`, `row`).
    fn write_line(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError>;

    /// Called once a frame is complete.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Where the surface lives on the I2C bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceAddress {
    pub address: u8,
    pub bus: u8,
}

impl Default for SurfaceAddress {
    fn default() -> Self {
        Self {
            address: 0x27,
            bus: 1,
        }
    }
}

/// Pushes [`DisplayPlan`]s to a surface.
pub struct Renderer<D, S> {
    surface: D,
    sleeper: S,
    address: SurfaceAddress,
}

impl<D: DisplaySurface, S: Sleep> Renderer<D, S> {
    pub fn new(surface: D, sleeper: S, address: SurfaceAddress) -> Self {
        Self {
            surface,
            sleeper,
            address,
        }
    }

    /// Show the plan. Returns `false` if any frame failed to reach the
    /// surface; alternating plans keep their timing even then.
    pub fn render(&mut self, plan: &DisplayPlan) -> bool {
        match plan {
            DisplayPlan::Static(frame) => self.show(frame),
            DisplayPlan::Alternating {
                first,
                second,
                duration,
            } => {
                let screen_time = *duration / 2;
                info!(line1 = first.line1(), line2 = first.line2(), "screen 1");
                let first_ok = self.show(first);
                self.sleeper.sleep(screen_time);

                info!(line1 = second.line1(), line2 = second.line2(), "screen 2");
                let second_ok = self.show(second);
                self.sleeper.sleep(screen_time);

                first_ok && second_ok
            }
        }
    }

    /// Give the surface back, mostly for inspection in tests.
    pub fn into_surface(self) -> D {
        self.surface
    }

    fn show(&mut self, frame: &ScreenContent) -> bool {
        match self.draw(frame) {
            Ok(()) => {
                info!(line1 = frame.line1(), line2 = frame.line2(), "LCD updated");
                true
            }
            Err(e) => {
                error!(error = %e, "LCD render failed");
                false
            }
        }
    }

    fn draw(&mut self, frame: &ScreenContent) -> Result<(), DisplayError> {
        self.surface.init(self.address.address, self.address.bus)?;
        self.surface.clear()?;
        for (row, line) in (0..LCD_ROWS).zip(frame.lines()) {
            if !line.is_empty() {
                self.surface.write_line(0, row, line)?;
            }
        }
        self.surface.flush()
    }
}
