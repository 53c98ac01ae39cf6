//! Virtual character LCD.
//!
//! This module provides a 2-line × 16-column virtual display matching the
//! HD44780-style modules fitted to the lock. It pads and truncates text to
//! the panel width and keeps a revision counter so a renderer can redraw
//! only when the contents change.
//!
//! # Character Encoding - ASCII Only
//!
//! Character LCDs only render printable ASCII (0x20-0x7E). Control
//! characters are stripped and any other character is replaced with `?`,
//! which is what the panel's character ROM would show for an unknown code.
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::lcd::LcdDisplay;
//! use doorlock_hardware::traits::TextDisplay;
//!
//! let mut lcd = LcdDisplay::new(2, 16).unwrap();
//! lcd.display("Enter Password:", "****");
//!
//! assert_eq!(lcd.get_line(0).unwrap(), "Enter Password: ");
//! assert_eq!(lcd.get_line(1).unwrap().trim_end(), "****");
//! ```

use crate::{HardwareError, Result, traits::TextDisplay};

/// Number of display lines (standard LCD configuration).
pub const DEFAULT_LINES: usize = 2;

/// Number of characters per line (standard LCD configuration).
pub const DEFAULT_COLUMNS: usize = 16;

/// Virtual character LCD.
///
/// # Thread Safety
///
/// This struct is not thread-safe. The controller owns it inside a
/// single poll loop.
#[derive(Debug, Clone)]
pub struct LcdDisplay {
    lines: usize,
    columns: usize,
    buffer: Vec<String>,
    revision: u64,
}

impl LcdDisplay {
    /// Create a blank display with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` if `lines` or `columns`
    /// is zero.
    pub fn new(lines: usize, columns: usize) -> Result<Self> {
        if lines == 0 || columns == 0 {
            return Err(HardwareError::configuration(format!(
                "LCD must have at least one line and column, got {lines}x{columns}"
            )));
        }
        Ok(Self::blank(lines, columns))
    }

    fn blank(lines: usize, columns: usize) -> Self {
        Self {
            lines,
            columns,
            buffer: vec![" ".repeat(columns); lines],
            revision: 0,
        }
    }

    /// Set text on a specific line, padded or truncated to the panel width.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidLine` if the line index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::lcd::LcdDisplay;
    ///
    /// let mut lcd = LcdDisplay::default();
    /// lcd.set_line(0, "LOCKED OUT!").unwrap();
    /// assert_eq!(lcd.get_line(0).unwrap(), "LOCKED OUT!     ");
    /// ```
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        let max = self.lines - 1;
        let slot = self
            .buffer
            .get_mut(line)
            .ok_or(HardwareError::InvalidLine { line, max })?;
        if fill_line(slot, text, self.columns) {
            self.revision += 1;
        }
        Ok(())
    }

    /// Get text from a specific line, padded to the column width.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidLine` if the line index is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        if line >= self.lines {
            return Err(HardwareError::InvalidLine {
                line,
                max: self.lines - 1,
            });
        }
        Ok(&self.buffer[line])
    }

    /// Get all lines.
    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(|s| s.as_str()).collect()
    }

    /// Counter bumped whenever the visible contents change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of columns per line.
    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl Default for LcdDisplay {
    fn default() -> Self {
        Self::blank(DEFAULT_LINES, DEFAULT_COLUMNS)
    }
}

impl TextDisplay for LcdDisplay {
    /// Show `line1` and `line2` on the first two lines. A single-line panel
    /// shows only `line1`.
    fn display(&mut self, line1: &str, line2: &str) {
        for (slot, text) in self.buffer.iter_mut().zip([line1, line2]) {
            if fill_line(slot, text, self.columns) {
                self.revision += 1;
            }
        }
    }
}

/// Write `text` into `slot`, padded or truncated to `columns`. Returns
/// whether the slot changed.
fn fill_line(slot: &mut String, text: &str, columns: usize) -> bool {
    let mut fitted: String = sanitize_text(text).chars().take(columns).collect();
    let padding = columns.saturating_sub(fitted.chars().count());
    fitted.extend(std::iter::repeat_n(' ', padding));

    if *slot == fitted {
        return false;
    }
    *slot = fitted;
    true
}

/// Strip control characters and replace anything the panel cannot render.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_display_is_blank() {
        let lcd = LcdDisplay::default();
        assert_eq!(lcd.lines(), 2);
        assert_eq!(lcd.columns(), 16);
        assert!(lcd.get_all_lines().iter().all(|l| l.trim().is_empty()));
        assert_eq!(lcd.revision(), 0);
    }

    #[test]
    fn test_display_sets_both_lines() {
        let mut lcd = LcdDisplay::default();
        lcd.display("Door Open", "Closing in 9s");
        assert_eq!(lcd.get_line(0).unwrap(), "Door Open       ");
        assert_eq!(lcd.get_line(1).unwrap(), "Closing in 9s   ");
    }

    #[test]
    fn test_long_text_truncated() {
        let mut lcd = LcdDisplay::default();
        lcd.set_line(0, "This line is far too long for the panel")
            .unwrap();
        assert_eq!(lcd.get_line(0).unwrap(), "This line is far");
    }

    #[test]
    fn test_invalid_line() {
        let mut lcd = LcdDisplay::default();
        assert!(matches!(
            lcd.set_line(2, "x"),
            Err(HardwareError::InvalidLine { line: 2, max: 1 })
        ));
        assert!(lcd.get_line(5).is_err());
    }

    #[test]
    fn test_revision_counts_changes_only() {
        let mut lcd = LcdDisplay::default();
        lcd.display("Enter Password:", "");
        let first = lcd.revision();
        assert_eq!(first, 1);

        lcd.display("Enter Password:", "");
        assert_eq!(lcd.revision(), first);

        lcd.display("Enter Password:", "*");
        assert_eq!(lcd.revision(), first + 1);

        lcd.display("Wrong Password!", "Attempts: 1/3");
        assert_eq!(lcd.revision(), first + 3);
    }

    #[test]
    fn test_single_line_panel() {
        let mut lcd = LcdDisplay::new(1, 8).unwrap();
        lcd.display("Locked", "ignored");
        assert_eq!(lcd.get_all_lines(), vec!["Locked  "]);
    }

    #[rstest]
    #[case("Tab\there", "Tabhere")]
    #[case("caf\u{e9}", "caf?")]
    #[case("Wait 5s", "Wait 5s")]
    fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_text(input), expected);
    }

    #[rstest]
    #[case(0, 16)]
    #[case(2, 0)]
    fn test_zero_dimension_rejected(#[case] lines: usize, #[case] columns: usize) {
        assert!(matches!(
            LcdDisplay::new(lines, columns),
            Err(HardwareError::ConfigurationError { .. })
        ));
    }

    #[rstest]
    #[case("abc", 3, "abc")]
    #[case("abc", 4, "abc ")]
    #[case("abcdef", 4, "abcd")]
    #[case("", 3, "   ")]
    fn test_fill_line_edges(#[case] text: &str, #[case] width: usize, #[case] expected: &str) {
        let mut slot = String::new();
        assert!(fill_line(&mut slot, text, width));
        assert_eq!(slot, expected);
        assert!(!fill_line(&mut slot, text, width));
    }
}
