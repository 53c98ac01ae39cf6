//! A wired keypad: matrix sweep plus debounced scanner.

use std::time::{Duration, Instant};

use doorlock_core::{KeyMap, LockConfig};
use doorlock_hardware::{InputPin, OutputPin};

use crate::{KeypadError, KeypadMatrix, MatrixScanner, Result};

/// Matrix keypad that yields one character per physical press.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use doorlock_core::{KeyMap, LockConfig};
/// use doorlock_hardware::mock::MockMatrix;
/// use doorlock_keypad::{Keypad, KeypadMatrix};
///
/// let (rows, cols, handle) = MockMatrix::new(4, 4).unwrap();
/// let matrix = KeypadMatrix::new(rows, cols).unwrap();
/// let mut keypad = Keypad::new(matrix, KeyMap::default(), Duration::from_millis(50)).unwrap();
///
/// let t0 = Instant::now();
/// handle.press(3, 2).unwrap();
/// assert_eq!(keypad.get_key(t0), Some('#'));
/// assert_eq!(keypad.get_key(t0 + Duration::from_millis(100)), None);
/// ```
#[derive(Debug)]
pub struct Keypad<R: OutputPin, C: InputPin> {
    matrix: KeypadMatrix<R, C>,
    scanner: MatrixScanner,
}

impl<R: OutputPin, C: InputPin> Keypad<R, C> {
    /// Combine a wired matrix with its key map.
    ///
    /// # Errors
    ///
    /// Returns `KeypadError::DimensionMismatch` if the matrix wiring and the
    /// key map disagree on rows or columns.
    pub fn new(matrix: KeypadMatrix<R, C>, key_map: KeyMap, debounce: Duration) -> Result<Self> {
        if matrix.rows() != key_map.rows() || matrix.cols() != key_map.cols() {
            return Err(KeypadError::DimensionMismatch {
                wired_rows: matrix.rows(),
                wired_cols: matrix.cols(),
                map_rows: key_map.rows(),
                map_cols: key_map.cols(),
            });
        }

        Ok(Self {
            matrix,
            scanner: MatrixScanner::new(key_map, debounce),
        })
    }

    /// Build from the keypad layout and debounce window of a lock
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `KeypadError::Core` if the layout is invalid, or
    /// `KeypadError::DimensionMismatch` if it does not fit the wiring.
    pub fn from_config(matrix: KeypadMatrix<R, C>, config: &LockConfig) -> Result<Self> {
        let key_map = config.key_map()?;
        Self::new(matrix, key_map, config.debounce())
    }

    /// Sweep the matrix and return a key if a new press was detected.
    pub fn get_key(&mut self, now: Instant) -> Option<char> {
        let cell = self.matrix.sweep();
        self.scanner.poll(cell, now)
    }

    /// Debounced scanner state.
    pub fn scanner(&self) -> &MatrixScanner {
        &self.scanner
    }
}
