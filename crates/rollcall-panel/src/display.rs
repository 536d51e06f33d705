//! Virtual character LCD.
//!
//! This module provides a 2-line x 16-column display that behaves like the
//! HD44780-style LCD on the terminal: text is written at a cursor position and
//! overwrites whatever is underneath, the rest of the line is left alone, and
//! anything past the last column is dropped.
//!
//! # Character Encoding - ASCII Only
//!
//! The LCD character ROM only covers printable ASCII. Control characters are
//! removed and any other non-ASCII character is shown as `?`, so tests see
//! exactly what the hardware would show.
//!
//! # Examples
//!
//! ```
//! use rollcall_panel::VirtualDisplay;
//!
//! let mut display = VirtualDisplay::default();
//!
//! display.set_line(0, "Enter Your RNum").unwrap();
//! display.write_at(1, 0, "1").unwrap();
//! display.write_at(1, 1, "2").unwrap();
//! display.write_at(0, 0, "# Confirm C Abrt").unwrap();
//!
//! assert_eq!(display.get_line(0).unwrap(), "# Confirm C Abrt");
//! assert_eq!(display.get_line(1).unwrap().trim_end(), "12");
//! ```

use rollcall_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use rollcall_core::{Error, Result};
use rollcall_hardware::{DisplayDevice, HardwareError};

/// In-memory character display.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. The panel owns it exclusively.
#[derive(Debug, Clone)]
pub struct VirtualDisplay {
    /// Number of lines in the display.
    lines: usize,

    /// Number of columns per line.
    columns: usize,

    /// Current display buffer, every line exactly `columns` ASCII bytes.
    buffer: Vec<String>,

    /// Backlight state.
    backlight: bool,
}

impl VirtualDisplay {
    /// Create a blank display with the given geometry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_panel::VirtualDisplay;
    ///
    /// let display = VirtualDisplay::new(4, 20);
    /// assert_eq!(display.get_all_lines().len(), 4);
    /// assert_eq!(display.get_line(0).unwrap().len(), 20);
    /// ```
    pub fn new(lines: usize, columns: usize) -> Self {
        Self {
            lines,
            columns,
            buffer: vec![" ".repeat(columns); lines],
            backlight: false,
        }
    }

    /// Write `text` starting at `(line, column)`, overwriting what is there.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the display.
    pub fn write_at(&mut self, line: usize, column: usize, text: &str) -> Result<()> {
        self.check_line(line)?;
        if column >= self.columns {
            return Err(Error::InvalidColumn {
                column,
                max: self.columns.saturating_sub(1),
            });
        }

        let text = sanitize_text(text);
        let text = truncate_text(&text, self.columns - column);
        let end = column + text.len();
        self.buffer[line].replace_range(column..end, &text);
        Ok(())
    }

    /// Replace a whole line, padding with spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        self.check_line(line)?;
        self.buffer[line] = pad_text(&sanitize_text(text), self.columns);
        Ok(())
    }

    /// Set both lines simultaneously.
    pub fn set_lines(&mut self, first: &str, second: &str) -> Result<()> {
        self.set_line(0, first)?;
        self.set_line(1, second)
    }

    /// Clear all lines by filling them with spaces.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    /// Get text from a specific line, padded to column width.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        self.check_line(line)?;
        Ok(&self.buffer[line])
    }

    /// Get all lines as a vector.
    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(String::as_str).collect()
    }

    /// Lines with trailing padding removed, e.g. for assertions.
    pub fn trimmed_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(|line| line.trim_end()).collect()
    }

    /// Returns `true` if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|line| line.trim().is_empty())
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    fn check_line(&self, line: usize) -> Result<()> {
        if line >= self.lines {
            return Err(Error::InvalidLine {
                line,
                max: self.lines.saturating_sub(1),
            });
        }
        Ok(())
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::new(DISPLAY_LINES, DISPLAY_COLUMNS)
    }
}

impl DisplayDevice for VirtualDisplay {
    fn geometry(&self) -> (usize, usize) {
        (self.lines, self.columns)
    }

    async fn clear(&mut self) -> rollcall_hardware::Result<()> {
        VirtualDisplay::clear(self);
        Ok(())
    }

    async fn print_at(
        &mut self,
        line: usize,
        column: usize,
        text: &str,
    ) -> rollcall_hardware::Result<()> {
        self.write_at(line, column, text)
            .map_err(|e| HardwareError::invalid_data(e.to_string()))
    }

    async fn print_line(&mut self, line: usize, text: &str) -> rollcall_hardware::Result<()> {
        self.set_line(line, text)
            .map_err(|e| HardwareError::invalid_data(e.to_string()))
    }

    async fn set_backlight(&mut self, enabled: bool) -> rollcall_hardware::Result<()> {
        self.backlight = enabled;
        Ok(())
    }
}

/// Truncate ASCII text to a maximum number of characters.
///
/// # Examples
///
/// ```
/// use rollcall_panel::display::truncate_text;
///
/// assert_eq!(truncate_text("Ana-Maria O'Neil", 9), "Ana-Maria");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Left-align text in a fixed width, truncating or padding with spaces.
///
/// # Examples
///
/// ```
/// use rollcall_panel::display::pad_text;
///
/// assert_eq!(pad_text("Error", 8), "Error   ");
/// assert_eq!(pad_text("User Not Found", 4), "User");
/// ```
pub fn pad_text(text: &str, width: usize) -> String {
    let truncated = truncate_text(text, width);
    let padding = width - truncated.chars().count();
    format!("{truncated}{}", " ".repeat(padding))
}

/// Remove control characters and replace anything outside ASCII with `?`.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}
