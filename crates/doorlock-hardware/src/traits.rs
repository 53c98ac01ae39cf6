//! Hardware capability and peripheral trait definitions.
//!
//! Two layers of traits decouple the controller from concrete boards:
//!
//! - **Pin capabilities** ([`InputPin`], [`OutputPin`]) stand in for the
//!   GPIO lines of the keypad matrix, the relay and the lamp. Levels are
//!   plain booleans: `true` is electrically high.
//! - **Peripherals** ([`TextDisplay`], [`LockActuator`], [`StatusIndicator`])
//!   are the collaborators the access controller talks to. They are
//!   idempotent and infallible from the controller's point of view; any
//!   failure is the adapter's concern.
//!
//! All methods are synchronous. The controller runs in a cooperative poll
//! loop and never waits on a device, so there is nothing to `.await`.
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::traits::{LockActuator, OutputPin};
//!
//! struct Relay<P: OutputPin>(P);
//!
//! impl<P: OutputPin> LockActuator for Relay<P> {
//!     fn set_actuator(&mut self, unlocked: bool) {
//!         self.0.write(unlocked);
//!     }
//! }
//! ```

use crate::types::IndicatorMode;

/// Digital input line.
pub trait InputPin {
    /// Sample the current level (`true` = high).
    fn read(&self) -> bool;
}

/// Digital output line.
pub trait OutputPin {
    /// Drive the line to `level` (`true` = high).
    fn write(&mut self, level: bool);
}

/// Two-line character display.
pub trait TextDisplay {
    /// Replace the whole screen with two lines of text.
    ///
    /// Text longer than the display width is truncated by the adapter.
    fn display(&mut self, line1: &str, line2: &str);
}

/// Door lock actuator (relay, solenoid or servo).
pub trait LockActuator {
    /// Unlock (`true`) or lock (`false`) the door. Repeating a command has no
    /// further effect.
    fn set_actuator(&mut self, unlocked: bool);
}

/// Status lamp.
pub trait StatusIndicator {
    /// Switch the lamp to `mode`. Repeating a mode has no further effect.
    fn set_indicator(&mut self, mode: IndicatorMode);
}
