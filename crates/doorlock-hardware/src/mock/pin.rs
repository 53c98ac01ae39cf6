//! Simulated GPIO lines and keypad matrix wiring.
//!
//! [`MockPin`] is a single line whose level can be observed and forced from
//! tests. [`MockMatrix`] reproduces the electrical behaviour of a membrane
//! keypad: row lines are outputs, column lines are inputs with pull-ups, and
//! a pressed key shorts its row to its column. A column therefore reads low
//! only while a pressed key on that column sits on a row that is driven low.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    HardwareError, Result,
    traits::{InputPin, OutputPin},
};

/// Simulated digital line.
///
/// Clones share the same level, so a test can keep one clone to observe a
/// line that has been moved into a driver.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockPin;
/// use doorlock_hardware::traits::OutputPin;
///
/// let probe = MockPin::new(false);
/// let mut line = probe.clone();
/// line.write(true);
/// assert!(probe.level());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    level: Arc<AtomicBool>,
}

impl MockPin {
    /// Create a line at the given initial level.
    pub fn new(level: bool) -> Self {
        Self {
            level: Arc::new(AtomicBool::new(level)),
        }
    }

    /// Current level.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    /// Force the level from outside, as an external circuit would.
    pub fn set_level(&self, level: bool) {
        self.level.store(level, Ordering::SeqCst);
    }
}

impl InputPin for MockPin {
    fn read(&self) -> bool {
        self.level()
    }
}

impl OutputPin for MockPin {
    fn write(&mut self, level: bool) {
        self.set_level(level);
    }
}

#[derive(Debug)]
struct Wiring {
    rows: usize,
    cols: usize,
    /// `true` while the row line is driven low.
    row_low: Vec<AtomicBool>,
    /// Row-major pressed state of every key.
    pressed: Vec<AtomicBool>,
}

impl Wiring {
    fn column_level(&self, col: usize) -> bool {
        let shorted_low = (0..self.rows).any(|row| {
            self.row_low[row].load(Ordering::SeqCst)
                && self.pressed[row * self.cols + col].load(Ordering::SeqCst)
        });
        // Pull-up keeps the column high unless a pressed key connects it to a low row.
        !shorted_low
    }
}

/// Simulated keypad matrix.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockMatrix;
/// use doorlock_hardware::traits::{InputPin, OutputPin};
///
/// let (mut rows, cols, handle) = MockMatrix::new(4, 4).unwrap();
/// handle.press(1, 2).unwrap();
///
/// rows[1].write(false);
/// assert!(!cols[2].read());
/// assert!(cols[0].read());
///
/// rows[1].write(true);
/// assert!(cols[2].read());
/// ```
#[derive(Debug)]
pub struct MockMatrix;

impl MockMatrix {
    /// Wire up a `rows` x `cols` matrix.
    ///
    /// Returns the row output lines, the column input lines and a handle
    /// that presses and releases keys.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either dimension is zero.
    pub fn new(
        rows: usize,
        cols: usize,
    ) -> Result<(Vec<MockRowPin>, Vec<MockColumnPin>, MockMatrixHandle)> {
        if rows == 0 || cols == 0 {
            return Err(HardwareError::configuration(format!(
                "matrix must have at least one row and column, got {rows}x{cols}"
            )));
        }

        let wiring = Arc::new(Wiring {
            rows,
            cols,
            row_low: (0..rows).map(|_| AtomicBool::new(false)).collect(),
            pressed: (0..rows * cols).map(|_| AtomicBool::new(false)).collect(),
        });

        let row_pins = (0..rows)
            .map(|row| MockRowPin {
                wiring: Arc::clone(&wiring),
                row,
            })
            .collect();
        let col_pins = (0..cols)
            .map(|col| MockColumnPin {
                wiring: Arc::clone(&wiring),
                col,
            })
            .collect();

        Ok((row_pins, col_pins, MockMatrixHandle { wiring }))
    }
}

/// Row line of a [`MockMatrix`].
#[derive(Debug)]
pub struct MockRowPin {
    wiring: Arc<Wiring>,
    row: usize,
}

impl OutputPin for MockRowPin {
    fn write(&mut self, level: bool) {
        self.wiring.row_low[self.row].store(!level, Ordering::SeqCst);
    }
}

/// Column line of a [`MockMatrix`].
#[derive(Debug)]
pub struct MockColumnPin {
    wiring: Arc<Wiring>,
    col: usize,
}

impl InputPin for MockColumnPin {
    fn read(&self) -> bool {
        self.wiring.column_level(self.col)
    }
}

/// Handle for pressing keys on a [`MockMatrix`].
///
/// The handle can be cloned and moved to another thread or task; key state is
/// shared atomically with the pins.
#[derive(Debug, Clone)]
pub struct MockMatrixHandle {
    wiring: Arc<Wiring>,
}

impl MockMatrixHandle {
    /// Hold the key at (`row`, `col`) down.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidCell` if the cell is not wired.
    pub fn press(&self, row: usize, col: usize) -> Result<()> {
        self.set(row, col, true)
    }

    /// Let go of the key at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidCell` if the cell is not wired.
    pub fn release(&self, row: usize, col: usize) -> Result<()> {
        self.set(row, col, false)
    }

    /// Whether the key at (`row`, `col`) is held.
    pub fn is_pressed(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .is_ok_and(|index| self.wiring.pressed[index].load(Ordering::SeqCst))
    }

    /// Matrix dimensions as (rows, cols).
    pub fn size(&self) -> (usize, usize) {
        (self.wiring.rows, self.wiring.cols)
    }

    fn set(&self, row: usize, col: usize, pressed: bool) -> Result<()> {
        let index = self.index(row, col)?;
        self.wiring.pressed[index].store(pressed, Ordering::SeqCst);
        Ok(())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        let (rows, cols) = self.size();
        if row >= rows || col >= cols {
            return Err(HardwareError::InvalidCell {
                row,
                col,
                rows,
                cols,
            });
        }
        Ok(row * cols + col)
    }
}
