//! Text shown on the two-line display.
//!
//! Every screen is a `(line1, line2)` pair sized for a 16-column panel.

use std::time::Duration;

use doorlock_core::constants::FIRMWARE_BANNER;

/// Two lines of display text.
pub type Screen = (String, String);

fn screen(line1: impl Into<String>, line2: impl Into<String>) -> Screen {
    (line1.into(), line2.into())
}

/// Prompt with one `*` per digit entered.
pub fn prompt(entered: usize) -> Screen {
    screen("Enter Password:", "*".repeat(entered))
}

/// Shown when a correct password opens the door.
pub fn access_granted() -> Screen {
    screen("Access Granted!", "Door Opening...")
}

/// Shown after a wrong password, with the failure count out of `max`.
pub fn wrong_password(failed: u32, max: u32) -> Screen {
    screen("Wrong Password!", format!("Attempts: {}/{}", failed, max))
}

/// Shown when a lockout starts, with its length in whole seconds.
pub fn too_many_tries(lockout: Duration) -> Screen {
    screen("TOO MANY TRIES!", format!("Locked {}s", lockout.as_secs()))
}

/// Countdown while locked out. `remaining` is rounded down to whole seconds.
pub fn locked_out(remaining: Duration) -> Screen {
    screen("LOCKED OUT!", format!("Wait {}s", remaining.as_secs()))
}

/// Countdown while the door is open. `remaining` is rounded down to whole
/// seconds.
pub fn door_open(remaining: Duration) -> Screen {
    screen("Door Open", format!("Closing in {}s", remaining.as_secs()))
}

/// Shown when the submit key is pressed with nothing entered.
pub fn enter_password_first() -> Screen {
    screen("Enter Password", "First!")
}

/// Shown when the clear key is pressed with nothing entered.
pub fn nothing_to_clear() -> Screen {
    screen("Nothing to Clear", "")
}

/// Firmware banner and the current failure count.
pub fn info(failed: u32) -> Screen {
    screen(FIRMWARE_BANNER, format!("Attempts: {}", failed))
}

/// Indicator flash speed after a toggle.
pub fn flash_speed(fast: bool) -> Screen {
    if fast {
        screen("Fast Flash ON", "")
    } else {
        screen("Normal Flash", "")
    }
}

/// Result of the reset key; `had_attempts` is whether anything was cleared.
pub fn attempts_reset(had_attempts: bool) -> Screen {
    if had_attempts {
        screen("Attempts Reset", "")
    } else {
        screen("No Attempts", "")
    }
}

/// Door status summary.
pub fn status() -> Screen {
    screen("Door: CLOSED", "Ready")
}
