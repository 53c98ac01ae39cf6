//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without requiring physical hardware.

pub mod peripherals;
pub mod pin;

// Re-export commonly used types
pub use peripherals::{MockActuator, MockDisplay, MockIndicator};
pub use pin::{MockColumnPin, MockMatrix, MockMatrixHandle, MockPin, MockRowPin};
