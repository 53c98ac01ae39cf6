//! Row-drive / column-sample sweep of a keypad matrix.
//!
//! Rows are outputs idling high; columns are inputs with pull-ups. To scan,
//! one row at a time is driven low and every column is sampled: a column
//! reading low means the key at that (row, column) is pressed.
//!
//! Rows are visited in index order and, within a row, columns in index
//! order. The first active cell wins, which gives a deterministic answer
//! when several keys are held. Ghosting is not detected; only single-key
//! presses are guaranteed to resolve correctly.

use doorlock_hardware::{HardwareError, InputPin, OutputPin};
use tracing::trace;

use crate::Result;

/// Electrical interface to an R × C keypad.
#[derive(Debug)]
pub struct KeypadMatrix<R: OutputPin, C: InputPin> {
    rows: Vec<R>,
    cols: Vec<C>,
}

impl<R: OutputPin, C: InputPin> KeypadMatrix<R, C> {
    /// Take ownership of the row and column lines and park every row high.
    ///
    /// # Errors
    ///
    /// Returns a hardware configuration error if either set of lines is empty.
    pub fn new(mut rows: Vec<R>, cols: Vec<C>) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() {
            return Err(HardwareError::configuration(format!(
                "keypad needs at least one row and one column, got {}x{}",
                rows.len(),
                cols.len()
            ))
            .into());
        }

        for row in &mut rows {
            row.write(true);
        }

        Ok(Self { rows, cols })
    }

    /// Number of row lines.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of column lines.
    pub fn cols(&self) -> usize {
        self.cols.len()
    }

    /// Sweep the matrix once and return the first active cell.
    ///
    /// Every row is left high on return.
    pub fn sweep(&mut self) -> Option<(usize, usize)> {
        let mut found = None;

        'rows: for active in 0..self.rows.len() {
            for (index, row) in self.rows.iter_mut().enumerate() {
                row.write(index != active);
            }

            for (col, line) in self.cols.iter().enumerate() {
                if !line.read() {
                    found = Some((active, col));
                    break 'rows;
                }
            }
        }

        for row in &mut self.rows {
            row.write(true);
        }

        if let Some((row, col)) = found {
            trace!(row, col, "Active cell");
        }
        found
    }
}
