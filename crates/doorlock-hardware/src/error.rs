//! Error types for hardware operations.
//!
//! Pin reads and writes are infallible at the capability level; these errors
//! cover the adapters around them, such as addressing a display line that
//! does not exist or pressing a cell outside a simulated matrix.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Display line index out of range.
    #[error("Invalid display line {line}, valid range is 0-{max}")]
    InvalidLine { line: usize, max: usize },

    /// Matrix cell outside the wired rows and columns.
    #[error("Invalid matrix cell ({row}, {col}) for a {rows}x{cols} matrix")]
    InvalidCell {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Device configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl HardwareError {
    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_error() {
        let error = HardwareError::InvalidLine { line: 2, max: 1 };
        assert_eq!(
            error.to_string(),
            "Invalid display line 2, valid range is 0-1"
        );
    }

    #[test]
    fn test_invalid_cell_error() {
        let error = HardwareError::InvalidCell {
            row: 4,
            col: 0,
            rows: 4,
            cols: 4,
        };
        assert_eq!(
            error.to_string(),
            "Invalid matrix cell (4, 0) for a 4x4 matrix"
        );
    }

    #[test]
    fn test_configuration_error() {
        let error = HardwareError::configuration("matrix needs at least one row");
        assert_eq!(
            error.to_string(),
            "Configuration error: matrix needs at least one row"
        );
    }
}
