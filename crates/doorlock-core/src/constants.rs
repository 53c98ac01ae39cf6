//! Default values for the door lock controller.
//!
//! Every tunable that [`LockConfig`](crate::LockConfig) exposes has its
//! factory default defined here, so the binary, the tests and the
//! configuration loader agree on a single source of truth.
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(DEFAULT_PASSWORD, "1234");
//! let open = Duration::from_millis(DEFAULT_OPEN_DURATION_MS);
//! assert_eq!(open.as_secs(), 10);
//! ```

// ============================================================================
// Credentials
// ============================================================================

/// Factory password accepted by a freshly flashed controller.
pub const DEFAULT_PASSWORD: &str = "1234";

/// Maximum number of digits the input buffer accepts.
///
/// Digits typed once the buffer is full are ignored.
pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 8;

/// Consecutive wrong submissions that trigger a lockout.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 3;

// ============================================================================
// Timing (milliseconds)
// ============================================================================

/// How long the actuator stays unlocked after a correct password.
pub const DEFAULT_OPEN_DURATION_MS: u64 = 10_000;

/// How long input is ignored after too many failed attempts.
pub const DEFAULT_LOCKOUT_DURATION_MS: u64 = 30_000;

/// Window that absorbs contact bounce around a key press edge.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// How long a transient notice (e.g. "Wrong Password!") stays on screen.
pub const DEFAULT_MESSAGE_DURATION_MS: u64 = 2_000;

/// Full on/off period of the indicator while the door is open.
///
/// The level toggles every half period, so 500 ms flashes at 2 Hz.
pub const DEFAULT_FLASH_PERIOD_MS: u64 = 500;

/// Flash period selected by the toggle-flash command key.
pub const DEFAULT_FAST_FLASH_PERIOD_MS: u64 = 200;

/// Cadence of the main poll loop (10 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// ============================================================================
// Keypad
// ============================================================================

/// Number of rows of the stock membrane keypad.
pub const DEFAULT_ROWS: usize = 4;

/// Number of columns of the stock membrane keypad.
pub const DEFAULT_COLS: usize = 4;

/// Character layout of the stock 4x4 membrane keypad, one string per row.
pub const DEFAULT_LAYOUT: [&str; DEFAULT_ROWS] = ["123A", "456B", "789C", "*0#D"];

/// Submits the input buffer for validation.
pub const DEFAULT_SUBMIT_KEY: char = '#';

/// Clears the input buffer.
pub const DEFAULT_CLEAR_KEY: char = '*';

/// Shows firmware banner and failed attempt count.
pub const DEFAULT_INFO_KEY: char = 'A';

/// Switches between normal and fast unlock flashing.
pub const DEFAULT_TOGGLE_FLASH_KEY: char = 'B';

/// Clears the failed attempt counter.
pub const DEFAULT_RESET_ATTEMPTS_KEY: char = 'C';

/// Shows the door status.
pub const DEFAULT_STATUS_KEY: char = 'D';

// ============================================================================
// Display
// ============================================================================

/// Banner shown by the info key and at start-up.
pub const FIRMWARE_BANNER: &str = "Door Lock v1.0";
