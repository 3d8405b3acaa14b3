//! # Display Mode Layouts
//!
//! Maps a display mode and its already-aggregated values to a [`DisplayPlan`].
//! Values are placed into the templates verbatim; the caller formats numbers.
//!
//! | Mode          | Values                                  | Screens |
//! |---------------|-----------------------------------------|---------|
//! | `local`       | temp, humid                             | 1       |
//! | `temp_group`  | min, max, avg                           | 1       |
//! | `humid_group` | min, max, avg                           | 1       |
//! | `weather`     | temp, humid, wind                       | 1       |
//! | `full_temp`   | min, min_team, max, max_team, avg       | 2 (5 s) |
//! | `full_humid`  | min, min_team, max, max_team, avg       | 2 (5 s) |
//!
//! The tag at the start of the first line (`[1]`, `[2]`, `[3]`) tells the
//! class which part of the lab the screen belongs to. Anything that does not
//! match a mode, including a known mode with too few values, is shown as
//! free text split over the two lines.

use crate::display::{DisplayPlan, ScreenContent, LCD_COLUMNS};
use std::time::Duration;

/// Total time the two screens of `full_temp`/`full_humid` are shown
pub const ALTERNATING_DURATION: Duration = Duration::from_secs(5);

/// How far from the middle the free-text splitter looks for a space
pub const SPLIT_WINDOW: usize = 8;

/// Recognised display modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Local,
    TempGroup,
    HumidGroup,
    Weather,
    FullTemp,
    FullHumid,
}

impl DisplayMode {
    pub const ALL: [Self; 6] = [
        Self::Local,
        Self::TempGroup,
        Self::HumidGroup,
        Self::Weather,
        Self::FullTemp,
        Self::FullHumid,
    ];

    /// Case-insensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::TempGroup => "temp_group",
            Self::HumidGroup => "humid_group",
            Self::Weather => "weather",
            Self::FullTemp => "full_temp",
            Self::FullHumid => "full_humid",
        }
    }

    /// Number of values the mode needs.
    pub fn arity(self) -> usize {
        match self {
            Self::Local => 2,
            Self::TempGroup | Self::HumidGroup | Self::Weather => 3,
            Self::FullTemp | Self::FullHumid => 5,
        }
    }

    /// Lay out `values`. The caller guarantees `values.len() >= self.arity()`.
    fn layout(self, v: &[String]) -> DisplayPlan {
        match self {
            Self::Local => single(
                "[1] Local Data".to_string(),
                format!("{}C  {}%", v[0], v[1]),
            ),
            Self::TempGroup => single(
                format!("[2] T:{}-{}C", v[0], v[1]),
                format!("Average: {}C", v[2]),
            ),
            Self::HumidGroup => single(
                format!("[2] H:{}-{}%", v[0], v[1]),
                format!("Average: {}%", v[2]),
            ),
            Self::Weather => single(
                format!("[3] {}C  {}%", v[0], v[1]),
                format!("Wind: {}km/h", v[2]),
            ),
            Self::FullTemp => DisplayPlan::Alternating {
                first: ScreenContent::new(
                    format!("[2] T-:{}C ({})", v[0], v[1]),
                    format!("T+:{}C ({})", v[2], v[3]),
                ),
                second: ScreenContent::new(format!("[2] Tmoy:{}C", v[4]), ""),
                duration: ALTERNATING_DURATION,
            },
            // Both humidity screens use '%'; older lab scripts printed 'C'
            // on the first one.
            Self::FullHumid => DisplayPlan::Alternating {
                first: ScreenContent::new(
                    format!("[2] H-:{}% ({})", v[0], v[1]),
                    format!("H+:{}% ({})", v[2], v[3]),
                ),
                second: ScreenContent::new(format!("[2] Hmoy:{}%", v[4]), ""),
                duration: ALTERNATING_DURATION,
            },
        }
    }
}

fn single(line1: String, line2: String) -> DisplayPlan {
    DisplayPlan::Static(ScreenContent::new(line1, line2))
}

/// Build the plan for `mode` and its values.
///
/// Unknown modes, and known modes given too few values, fall back to showing
/// the mode and values joined by spaces.
pub fn plan(mode: &str, values: &[String]) -> DisplayPlan {
    match DisplayMode::parse(mode) {
        Some(known) if values.len() >= known.arity() => known.layout(values),
        _ => {
            let text = std::iter::once(mode)
                .chain(values.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            free_text(&text)
        }
    }
}

/// Show arbitrary text on the two lines.
pub fn free_text(text: &str) -> DisplayPlan {
    let (line1, line2) = split_two_lines(text);
    DisplayPlan::Static(ScreenContent::new(line1, line2))
}

/// Split text for the two LCD rows without clipping.
///
/// Text that fits on one row stays on the first line. Longer text is split at
/// the space closest to the middle, looking at most [`SPLIT_WINDOW`]
/// characters either way; the space itself is dropped. With no space in that
/// window the character at the middle is dropped instead, as if it were the
/// break.
pub fn split_two_lines(text: &str) -> (String, String) {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= LCD_COLUMNS {
        return (text.to_string(), String::new());
    }

    let mid = chars.len() / 2;
    match find_break(&chars, mid) {
        Some(at) => (
            chars[..at].iter().collect(),
            chars[at + 1..].iter().collect(),
        ),
        None => (
            chars[..mid].iter().collect(),
            chars[mid + 1..].iter().collect(),
        ),
    }
}

/// Space nearest to `mid`, preferring the left side on ties. Only `' '`
/// counts; tabs and other whitespace are ordinary characters here.
fn find_break(chars: &[char], mid: usize) -> Option<usize> {
    (0..=SPLIT_WINDOW)
        .flat_map(|d| [mid.checked_sub(d), (d > 0).then_some(mid + d)])
        .flatten()
        .filter(|&i| i < chars.len())
        .find(|&i| chars[i] == ' ')
}
