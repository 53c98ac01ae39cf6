//! Hardware abstraction layer for the door lock controller.
//!
//! This crate provides the capability traits the keypad scanner and the
//! access controller are written against, pin-backed drivers for the lock
//! relay and status lamp, a virtual character LCD, and mock devices for
//! development and testing without a board.
//!
//! # Design Philosophy
//!
//! - **Capabilities, not boards**: the scanner sees [`InputPin`] and
//!   [`OutputPin`]; the controller sees [`TextDisplay`], [`LockActuator`] and
//!   [`StatusIndicator`]. Neither depends on a concrete HAL type.
//! - **Non-blocking**: every method returns immediately. Timing is expressed
//!   as deadlines checked by the caller's poll loop.
//! - **Infallible at the seam**: the controller never handles device errors.
//!   Adapters that can fail report through [`HardwareError`] at
//!   construction time.
//!
//! # Example
//!
//! ```
//! use doorlock_hardware::devices::{FlashingIndicator, RelayActuator};
//! use doorlock_hardware::mock::MockPin;
//! use doorlock_hardware::{IndicatorMode, LockActuator, StatusIndicator};
//!
//! let coil = MockPin::new(false);
//! let lamp = MockPin::new(false);
//!
//! let mut relay = RelayActuator::new(coil.clone());
//! let mut indicator = FlashingIndicator::new(lamp.clone());
//!
//! relay.set_actuator(true);
//! indicator.set_indicator(IndicatorMode::Solid);
//!
//! assert!(coil.level());
//! assert!(lamp.level());
//! ```
//!
//! [`InputPin`]: traits::InputPin
//! [`OutputPin`]: traits::OutputPin
//! [`TextDisplay`]: traits::TextDisplay
//! [`LockActuator`]: traits::LockActuator
//! [`StatusIndicator`]: traits::StatusIndicator

pub mod devices;
pub mod error;
pub mod lcd;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{InputPin, LockActuator, OutputPin, StatusIndicator, TextDisplay};
pub use types::IndicatorMode;
