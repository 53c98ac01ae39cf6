//! Error types for keypad construction.
//!
//! Scanning itself cannot fail: an empty sweep is a normal result. Errors
//! only arise when the wiring and the key map disagree at start-up.

use doorlock_core::Error as CoreError;
use doorlock_hardware::HardwareError;

/// Result type alias for keypad operations.
pub type Result<T> = std::result::Result<T, KeypadError>;

/// Errors raised while assembling a keypad.
#[derive(Debug, thiserror::Error)]
pub enum KeypadError {
    /// The wired matrix and the key map have different dimensions.
    #[error("Matrix is wired {wired_rows}x{wired_cols}, but key map is {map_rows}x{map_cols}")]
    DimensionMismatch {
        wired_rows: usize,
        wired_cols: usize,
        map_rows: usize,
        map_cols: usize,
    },

    /// Invalid key map or configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid pin wiring.
    #[error(transparent)]
    Hardware(#[from] HardwareError),
}
