//! Access control logic for the keypad door lock.
//!
//! This crate holds the part of the system that decides: given debounced key
//! presses and the current time, when does the door unlock, when does the
//! keypad lock out, and what does the display say.
//!
//! - [`AccessController`]: the state machine, generic over its peripherals
//! - [`ControllerState`] / [`LockMode`]: what the controller currently knows
//! - [`TransitionHistory`]: bounded record of recent mode changes
//! - [`screens`]: the text catalogue for the two-line display

pub mod controller;
pub mod screens;
pub mod state;

pub use controller::AccessController;
pub use state::{ControllerState, LockMode, MAX_HISTORY_SIZE, ModeTransition, TransitionHistory};
