//! Keypad matrix scanning with debouncing.
//!
//! The crate is split along the electrical / logical boundary:
//!
//! - [`KeypadMatrix`] drives rows and samples columns to find the first
//!   active cell of a sweep;
//! - [`MatrixScanner`] turns sweep results into one event per press;
//! - [`Keypad`] glues the two together for the poll loop.

pub mod error;
pub mod keypad;
pub mod matrix;
pub mod scanner;

pub use error::{KeypadError, Result};
pub use keypad::Keypad;
pub use matrix::KeypadMatrix;
pub use scanner::{MatrixScanner, ScanState};
