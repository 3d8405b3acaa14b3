//! # Result Line Formatting
//!
//! The sensor tool prints exactly one line on stdout, which the lab's
//! aggregation scripts parse:
//!
//! | Outcome            | CSV            | JSON                                                   |
//! |--------------------|----------------|--------------------------------------------------------|
//! | success            | `22.3,55.0`    | `{"temperature":22.3,"humidity":55.0}`                 |
//! | simulated success  | `21.4,48.9`    | adds `"simulation":true,"reason":"GPIO_ERROR"` and `"original_error"` |
//! | failure            | `ERROR,ERROR`  | `{"error":"timeout after 5 attempts"}`                 |
//!
//! A failed read is a data point, not a crash: downstream aggregators skip
//! `ERROR` rows.

use crate::acquisition::AcquisitionOutcome;
use clap::ValueEnum;
use serde_json::json;

/// CSV sentinel for a failed read
pub const CSV_ERROR: &str = "ERROR,ERROR";

/// Result line format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Render the outcome as a single line (no trailing newline).
pub fn format_outcome(outcome: &AcquisitionOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Csv => csv_line(outcome),
        OutputFormat::Json => json_line(outcome),
    }
}

fn csv_line(outcome: &AcquisitionOutcome) -> String {
    match outcome.reading() {
        Some(reading) => format!("{:.1},{:.1}", reading.temperature, reading.humidity),
        None => CSV_ERROR.to_string(),
    }
}

fn json_line(outcome: &AcquisitionOutcome) -> String {
    let value = match outcome {
        AcquisitionOutcome::Success(reading) => json!({
            "temperature": reading.temperature,
            "humidity": reading.humidity,
        }),
        AcquisitionOutcome::SimulatedSuccess {
            reading,
            reason,
            detail,
        } => json!({
            "temperature": reading.temperature,
            "humidity": reading.humidity,
            "simulation": true,
            "reason": reason.as_str(),
            "original_error": detail,
        }),
        AcquisitionOutcome::Failure(error) => json!({ "error": error.to_string() }),
    };
    value.to_string()
}
