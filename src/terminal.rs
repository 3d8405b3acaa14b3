//! Terminal stand-in for the LCD.
//!
//! Development builds (no `hardware` feature) and `lcd-display --stdout` draw
//! each frame as a boxed 16×2 panel, so layouts can be checked on a laptop:
//!
//! ```text
//! ┌────────────────┐
//! │[1] Local Data  │
//! │22.3C  55.0%    │
//! └────────────────┘
//! ```

use crate::display::{DisplayError, DisplaySurface, LCD_COLUMNS, LCD_ROWS};
use std::io::{self, Write};

const ROWS: usize = LCD_ROWS as usize;

/// Character grid printed to a writer on every flush.
pub struct TerminalSurface<W> {
    out: W,
    cells: [[char; LCD_COLUMNS]; ROWS],
    ready: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cells: [[' '; LCD_COLUMNS]; ROWS],
            ready: false,
        }
    }

    /// The panel as it would currently appear, one string per row.
    pub fn rows(&self) -> [String; ROWS] {
        self.cells.map(|row| row.iter().collect())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn require_ready(&self) -> Result<(), DisplayError> {
        if self.ready {
            Ok(())
        } else {
            Err(DisplayError::Init("display not initialised".to_string()))
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn init(&mut self, _address: u8, _bus: u8) -> Result<(), DisplayError> {
        self.ready = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.require_ready()?;
        self.cells = [[' '; LCD_COLUMNS]; ROWS];
        Ok(())
    }

    fn write_line(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        self.require_ready()?;
        let cells = self
            .cells
            .get_mut(usize::from(row))
            .ok_or(DisplayError::OutOfRange { col, row })?;
        let start = usize::from(col);
        if start >= LCD_COLUMNS {
            return Err(DisplayError::OutOfRange { col, row });
        }
        for (cell, c) in cells[start..].iter_mut().zip(text.chars()) {
            *cell = c;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let border = "─".repeat(LCD_COLUMNS);
        let mut panel = format!("┌{border}┐\n");
        for row in self.rows() {
            panel.push_str(&format!("│{row}│\n"));
        }
        panel.push_str(&format!("└{border}┘\n"));

        self.out
            .write_all(panel.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| DisplayError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_drawn_inside_a_box() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.init(0x27, 1).unwrap();
        surface.clear().unwrap();
        surface.write_line(0, 0, "[1] Local Data").unwrap();
        surface.write_line(0, 1, "22.3C  55.0%").unwrap();
        surface.flush().unwrap();

        let printed = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(
            printed,
            "┌────────────────┐\n\
             │[1] Local Data  │\n\
             │22.3C  55.0%    │\n\
             └────────────────┘\n"
        );
    }

    #[test]
    fn clear_blanks_the_previous_frame() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.init(0x27, 1).unwrap();
        surface.write_line(0, 0, "old text").unwrap();
        surface.clear().unwrap();
        assert_eq!(surface.rows()[0], " ".repeat(16));
    }

    #[test]
    fn writes_past_the_edge_are_cut_off() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.init(0x27, 1).unwrap();
        surface.write_line(10, 1, "abcdefghij").unwrap();
        assert_eq!(surface.rows()[1], "          abcdef");
        assert!(surface.write_line(0, 2, "x").is_err());
        assert!(surface.write_line(16, 0, "x").is_err());
    }

    #[test]
    fn drawing_before_init_fails() {
        let mut surface = TerminalSurface::new(Vec::new());
        assert!(matches!(
            surface.write_line(0, 0, "x"),
            Err(DisplayError::Init(_))
        ));
    }
}
