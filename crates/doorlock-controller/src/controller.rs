//! Access control state machine.
//!
//! [`AccessController`] turns debounced key events and the passage of time
//! into mode transitions and commands for the display, lock actuator and
//! status lamp. It never blocks: every wait is a deadline compared against
//! the `now` passed to [`handle_key`](AccessController::handle_key) and
//! [`handle_tick`](AccessController::handle_tick).
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//! use doorlock_controller::{AccessController, LockMode};
//! use doorlock_core::LockConfig;
//! use doorlock_hardware::mock::{MockActuator, MockDisplay, MockIndicator};
//!
//! let mut controller = AccessController::new(
//!     &LockConfig::default(),
//!     MockDisplay::new(),
//!     MockActuator::new(),
//!     MockIndicator::new(),
//! )
//! .unwrap();
//!
//! let t0 = Instant::now();
//! controller.start();
//! for key in "1234#".chars() {
//!     controller.handle_key(key, t0);
//! }
//! assert_eq!(controller.mode(), LockMode::DoorOpen);
//!
//! controller.handle_tick(t0 + Duration::from_secs(10));
//! assert_eq!(controller.mode(), LockMode::Idle);
//! ```

use std::time::{Duration, Instant};

use doorlock_core::{KeyAction, KeyBindings, LockConfig, Password, Result};
use doorlock_hardware::{IndicatorMode, LockActuator, StatusIndicator, TextDisplay};
use tracing::{debug, info, warn};

use crate::screens::{self, Screen};
use crate::state::{ControllerState, LockMode, ModeTransition, Phase, TransitionHistory};

/// A message shown in Idle until its deadline, then replaced by the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    until: Instant,
}

/// Settings the controller needs at run time, taken from a validated
/// [`LockConfig`].
#[derive(Debug, Clone)]
struct Settings {
    password: Password,
    max_password_length: usize,
    max_failed_attempts: u32,
    open_duration: Duration,
    lockout_duration: Duration,
    message_duration: Duration,
    flash_period: Duration,
    fast_flash_period: Duration,
    keys: KeyBindings,
}

impl Settings {
    fn from_config(config: &LockConfig) -> Self {
        Self {
            password: config.password.clone(),
            max_password_length: config.max_password_length,
            max_failed_attempts: config.max_failed_attempts,
            open_duration: config.open_duration(),
            lockout_duration: config.lockout_duration(),
            message_duration: config.message_duration(),
            flash_period: config.flash_period(),
            fast_flash_period: config.fast_flash_period(),
            keys: config.keys,
        }
    }
}

/// Keypad door lock controller.
///
/// Generic over its three collaborators so the same logic drives real
/// peripherals, the virtual LCD in the binary, and recording mocks in tests.
#[derive(Debug)]
pub struct AccessController<D: TextDisplay, A: LockActuator, I: StatusIndicator> {
    settings: Settings,
    state: ControllerState,
    notice: Option<Notice>,
    fast_flash: bool,
    history: TransitionHistory,
    display: D,
    actuator: A,
    indicator: I,
}

impl<D: TextDisplay, A: LockActuator, I: StatusIndicator> AccessController<D, A, I> {
    /// Create a controller in `Idle` with an empty buffer.
    ///
    /// No command is sent to the peripherals until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns the first configuration invariant `config` violates.
    pub fn new(config: &LockConfig, display: D, actuator: A, indicator: I) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            settings: Settings::from_config(config),
            state: ControllerState::new(),
            notice: None,
            fast_flash: false,
            history: TransitionHistory::new(),
            display,
            actuator,
            indicator,
        })
    }

    /// Put the peripherals in their resting state: door locked, lamp solid,
    /// prompt shown.
    pub fn start(&mut self) {
        info!(
            mode = %self.state.mode(),
            max_failed_attempts = self.settings.max_failed_attempts,
            "Access controller started"
        );
        self.actuator.set_actuator(false);
        self.indicator.set_indicator(IndicatorMode::Solid);
        self.notice = None;
        self.show_prompt();
    }

    /// Process one debounced key press.
    ///
    /// Keys are only acted on in `Idle`; in every other mode, and for
    /// characters that are neither digits nor bound to a command, the key is
    /// ignored.
    pub fn handle_key(&mut self, key: char, now: Instant) {
        let mode = self.state.mode();
        if !mode.accepts_input() {
            debug!(%mode, "Key ignored");
            return;
        }

        let Some(action) = self.settings.keys.classify(key) else {
            debug!(%key, "Unmapped key ignored");
            return;
        };

        match action {
            KeyAction::Digit(digit) => self.append_digit(digit),
            KeyAction::Submit => self.submit(now),
            KeyAction::Clear => self.clear_input(now),
            KeyAction::Info => {
                debug!("Info requested");
                self.show_notice(screens::info(self.state.failed_attempts), now);
            }
            KeyAction::ToggleFlash => {
                self.fast_flash = !self.fast_flash;
                info!(fast = self.fast_flash, period = ?self.flash_period(), "Unlock flash speed changed");
                self.show_notice(screens::flash_speed(self.fast_flash), now);
            }
            KeyAction::ResetAttempts => {
                let had_attempts = self.state.failed_attempts > 0;
                if had_attempts {
                    info!(failed_attempts = self.state.failed_attempts, "Failed attempts reset");
                }
                self.state.failed_attempts = 0;
                self.show_notice(screens::attempts_reset(had_attempts), now);
            }
            KeyAction::Status => {
                debug!("Status requested");
                self.show_notice(screens::status(), now);
            }
        }
    }

    /// Advance timers.
    ///
    /// Calling this repeatedly with the same `now` leaves the state as the
    /// first call left it.
    pub fn handle_tick(&mut self, now: Instant) {
        match self.state.phase {
            Phase::DoorOpen { deadline } if now >= deadline => self.close_door(now),
            Phase::DoorOpen { deadline } => {
                self.show(screens::door_open(deadline.saturating_duration_since(now)));
            }
            Phase::LockedOut { deadline } if now >= deadline => self.end_lockout(now),
            Phase::LockedOut { deadline } => {
                self.show(screens::locked_out(deadline.saturating_duration_since(now)));
            }
            Phase::Idle => {
                if self.notice.as_ref().is_some_and(|notice| now >= notice.until) {
                    self.notice = None;
                    self.show_prompt();
                }
            }
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Current mode.
    pub fn mode(&self) -> LockMode {
        self.state.mode()
    }

    /// Recent mode transitions, oldest first.
    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Whether the next unlock flashes at the fast rate.
    pub fn fast_flash(&self) -> bool {
        self.fast_flash
    }

    /// Flash mode used when the door unlocks.
    pub fn unlock_indicator(&self) -> IndicatorMode {
        IndicatorMode::flash(self.flash_period())
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Mutable access to the lamp, for adapters that need a periodic update.
    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }

    fn flash_period(&self) -> Duration {
        if self.fast_flash {
            self.settings.fast_flash_period
        } else {
            self.settings.flash_period
        }
    }

    fn append_digit(&mut self, digit: u8) {
        if self.state.input.len() >= self.settings.max_password_length {
            debug!(len = self.state.input.len(), "Input full, digit ignored");
            return;
        }

        self.state.input.push(char::from(b'0' + digit));
        self.notice = None;
        debug!(len = self.state.input.len(), "Digit entered");
        self.show_prompt();
    }

    fn submit(&mut self, now: Instant) {
        if self.state.input.is_empty() {
            debug!("Submit with empty input");
            self.show_notice(screens::enter_password_first(), now);
            return;
        }

        let entered = std::mem::take(&mut self.state.input);
        if self.settings.password.matches(&entered) {
            self.state.failed_attempts = 0;
            self.open_door(now);
            return;
        }

        self.state.failed_attempts += 1;
        let failed = self.state.failed_attempts;
        let max = self.settings.max_failed_attempts;
        warn!(failed_attempts = failed, max_failed_attempts = max, "Wrong password");

        if failed >= max {
            self.lock_out(now);
        } else {
            self.show_notice(screens::wrong_password(failed, max), now);
        }
    }

    fn clear_input(&mut self, now: Instant) {
        if self.state.input.is_empty() {
            self.show_notice(screens::nothing_to_clear(), now);
            return;
        }

        self.state.input.clear();
        self.notice = None;
        debug!("Input cleared");
        self.show_prompt();
    }

    fn open_door(&mut self, now: Instant) {
        let deadline = now + self.settings.open_duration;
        self.transition(Phase::DoorOpen { deadline }, now);
        self.notice = None;

        self.actuator.set_actuator(true);
        self.indicator.set_indicator(self.unlock_indicator());
        self.show(screens::access_granted());
        info!(open_for = ?self.settings.open_duration, "Access granted, door unlocked");
    }

    fn close_door(&mut self, now: Instant) {
        self.transition(Phase::Idle, now);

        self.actuator.set_actuator(false);
        self.indicator.set_indicator(IndicatorMode::Solid);
        self.show_prompt();
        info!("Door locked");
    }

    fn lock_out(&mut self, now: Instant) {
        let deadline = now + self.settings.lockout_duration;
        self.transition(Phase::LockedOut { deadline }, now);
        self.notice = None;

        self.indicator.set_indicator(IndicatorMode::Solid);
        self.show(screens::too_many_tries(self.settings.lockout_duration));
        warn!(
            failed_attempts = self.state.failed_attempts,
            locked_for = ?self.settings.lockout_duration,
            "Too many failed attempts, keypad locked out"
        );
    }

    fn end_lockout(&mut self, now: Instant) {
        self.transition(Phase::Idle, now);
        self.state.failed_attempts = 0;
        self.state.input.clear();

        self.show_prompt();
        info!("Lockout ended");
    }

    fn transition(&mut self, to: Phase, now: Instant) {
        let from = self.state.mode();
        debug_assert!(
            from.can_transition_to(&to.mode()),
            "invalid transition {} -> {}",
            from,
            to.mode()
        );

        self.state.phase = to;
        self.history.record(ModeTransition {
            from,
            to: to.mode(),
            at: now,
        });
        info!(%from, to = %to.mode(), "Mode transition");
    }

    fn show_notice(&mut self, screen: Screen, now: Instant) {
        self.notice = Some(Notice {
            until: now + self.settings.message_duration,
        });
        self.show(screen);
    }

    fn show_prompt(&mut self) {
        self.show(screens::prompt(self.state.input.len()));
    }

    fn show(&mut self, (line1, line2): Screen) {
        self.display.display(&line1, &line2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_core::Error;
    use doorlock_hardware::mock::{MockActuator, MockDisplay, MockIndicator};

    type TestController = AccessController<MockDisplay, MockActuator, MockIndicator>;

    fn controller_with(config: LockConfig) -> TestController {
        AccessController::new(
            &config,
            MockDisplay::new(),
            MockActuator::new(),
            MockIndicator::new(),
        )
        .unwrap()
    }

    fn controller() -> (TestController, Instant) {
        let mut controller = controller_with(LockConfig::default());
        let t0 = Instant::now();
        controller.start();
        (controller, t0)
    }

    fn type_keys(controller: &mut TestController, keys: &str, now: Instant) {
        for key in keys.chars() {
            controller.handle_key(key, now);
        }
    }

    fn secs(start: Instant, offset: u64) -> Instant {
        start + Duration::from_secs(offset)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LockConfig {
            max_password_length: 0,
            ..LockConfig::default()
        };
        let result = AccessController::new(
            &config,
            MockDisplay::new(),
            MockActuator::new(),
            MockIndicator::new(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_start_puts_peripherals_at_rest() {
        let (controller, _) = controller();
        assert!(!controller.actuator().is_unlocked());
        assert_eq!(controller.actuator().commands(), &[false]);
        assert_eq!(controller.indicator().mode(), IndicatorMode::Solid);
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));
    }

    #[test]
    fn test_digits_are_masked() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "123", t0);
        assert_eq!(controller.state().input_buffer(), "123");
        assert_eq!(controller.display().lines(), ("Enter Password:", "***"));
    }

    #[test]
    fn test_digits_beyond_max_length_ignored() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1234567890", t0);
        assert_eq!(controller.state().input_buffer(), "12345678");
    }

    #[test]
    fn test_correct_password_opens_door() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1234#", t0);

        assert_eq!(controller.mode(), LockMode::DoorOpen);
        assert_eq!(controller.state().input_buffer(), "");
        assert_eq!(controller.state().open_deadline(), Some(secs(t0, 10)));
        assert!(controller.actuator().is_unlocked());
        assert_eq!(controller.indicator().mode(), IndicatorMode::Flash { period_ms: 500 });
        assert_eq!(controller.display().lines(), ("Access Granted!", "Door Opening..."));
    }

    #[test]
    fn test_door_open_countdown() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1234#", t0);

        controller.handle_tick(t0 + Duration::from_millis(500));
        assert_eq!(controller.display().lines(), ("Door Open", "Closing in 9s"));

        controller.handle_tick(t0 + Duration::from_millis(9_001));
        assert_eq!(controller.display().lines(), ("Door Open", "Closing in 0s"));
    }

    #[test]
    fn test_door_relocks_at_deadline() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1234#", t0);

        controller.handle_tick(secs(t0, 10));
        assert_eq!(controller.mode(), LockMode::Idle);
        assert!(!controller.actuator().is_unlocked());
        assert_eq!(controller.indicator().mode(), IndicatorMode::Solid);
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));
    }

    #[test]
    fn test_wrong_password_counts_attempt() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "99#", t0);

        assert_eq!(controller.mode(), LockMode::Idle);
        assert_eq!(controller.state().failed_attempts(), 1);
        assert_eq!(controller.state().input_buffer(), "");
        assert_eq!(controller.display().lines(), ("Wrong Password!", "Attempts: 1/3"));
        assert!(controller.actuator().commands().iter().all(|unlocked| !unlocked));
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "9999#9999#9999#", t0);

        assert_eq!(controller.mode(), LockMode::LockedOut);
        assert_eq!(controller.state().failed_attempts(), 3);
        assert_eq!(controller.state().lockout_deadline(), Some(secs(t0, 30)));
        assert_eq!(controller.display().lines(), ("TOO MANY TRIES!", "Locked 30s"));

        controller.handle_tick(secs(t0, 5));
        assert_eq!(controller.display().lines(), ("LOCKED OUT!", "Wait 25s"));
    }

    #[test]
    fn test_lockout_expires() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "9999#9999#9999#", t0);

        controller.handle_tick(secs(t0, 30));
        assert_eq!(controller.mode(), LockMode::Idle);
        assert_eq!(controller.state().failed_attempts(), 0);
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));
    }

    #[test]
    fn test_keys_ignored_while_locked_out() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "9999#9999#9999#", t0);
        type_keys(&mut controller, "1234#C", secs(t0, 1));

        assert_eq!(controller.mode(), LockMode::LockedOut);
        assert_eq!(controller.state().failed_attempts(), 3);
        assert_eq!(controller.state().input_buffer(), "");
    }

    #[test]
    fn test_submit_empty_shows_notice() {
        let (mut controller, t0) = controller();
        controller.handle_key('#', t0);

        assert_eq!(controller.state().failed_attempts(), 0);
        assert_eq!(controller.display().lines(), ("Enter Password", "First!"));
    }

    #[test]
    fn test_clear_key() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "12*", t0);
        assert_eq!(controller.state().input_buffer(), "");
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));

        controller.handle_key('*', t0);
        assert_eq!(controller.display().lines(), ("Nothing to Clear", ""));
    }

    #[test]
    fn test_notice_expires_back_to_prompt() {
        let (mut controller, t0) = controller();
        controller.handle_key('D', t0);
        assert_eq!(controller.display().lines(), ("Door: CLOSED", "Ready"));

        controller.handle_tick(t0 + Duration::from_millis(1_999));
        assert_eq!(controller.display().lines(), ("Door: CLOSED", "Ready"));

        controller.handle_tick(secs(t0, 2));
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));
    }

    #[test]
    fn test_digit_dismisses_notice() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "5#", t0);
        controller.handle_key('7', t0);
        assert_eq!(controller.display().lines(), ("Enter Password:", "*"));

        let frames = controller.display().frames().len();
        controller.handle_tick(secs(t0, 5));
        assert_eq!(controller.display().frames().len(), frames);
    }

    #[test]
    fn test_info_key_shows_attempts() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1#A", t0);
        assert_eq!(controller.display().lines(), ("Door Lock v1.0", "Attempts: 1"));
    }

    #[test]
    fn test_reset_attempts_key() {
        let (mut controller, t0) = controller();
        controller.handle_key('C', t0);
        assert_eq!(controller.display().lines(), ("No Attempts", ""));

        type_keys(&mut controller, "1#1#C", t0);
        assert_eq!(controller.state().failed_attempts(), 0);
        assert_eq!(controller.display().lines(), ("Attempts Reset", ""));

        // Two more misses no longer lock out.
        type_keys(&mut controller, "1#1#", t0);
        assert_eq!(controller.mode(), LockMode::Idle);
    }

    #[test]
    fn test_toggle_flash_changes_unlock_rate() {
        let (mut controller, t0) = controller();
        controller.handle_key('B', t0);
        assert!(controller.fast_flash());
        assert_eq!(controller.display().lines(), ("Fast Flash ON", ""));

        type_keys(&mut controller, "1234#", t0);
        assert_eq!(controller.indicator().mode(), IndicatorMode::Flash { period_ms: 200 });

        controller.handle_tick(secs(t0, 10));
        controller.handle_key('B', secs(t0, 11));
        assert!(!controller.fast_flash());
        assert_eq!(controller.display().lines(), ("Normal Flash", ""));
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let (mut controller, t0) = controller();
        let frames = controller.display().frames().len();
        type_keys(&mut controller, "xZ!", t0);
        assert_eq!(controller.display().frames().len(), frames);
        assert_eq!(controller.state().input_buffer(), "");
    }

    #[test]
    fn test_zero_open_duration_relocks_on_next_tick() {
        let mut controller = controller_with(LockConfig {
            open_duration_ms: 0,
            ..LockConfig::default()
        });
        let t0 = Instant::now();
        controller.start();
        type_keys(&mut controller, "1234#", t0);
        assert_eq!(controller.mode(), LockMode::DoorOpen);

        controller.handle_tick(t0);
        assert_eq!(controller.mode(), LockMode::Idle);
    }

    #[test]
    fn test_zero_lockout_duration_ends_on_next_tick() {
        let mut controller = controller_with(LockConfig {
            lockout_duration_ms: 0,
            ..LockConfig::default()
        });
        let t0 = Instant::now();
        controller.start();
        type_keys(&mut controller, "9999#9999#9999#", t0);
        assert_eq!(controller.mode(), LockMode::LockedOut);
        assert_eq!(controller.state().lockout_deadline(), Some(t0));

        controller.handle_tick(t0);
        assert_eq!(controller.mode(), LockMode::Idle);
        assert_eq!(controller.state().failed_attempts(), 0);
        assert_eq!(controller.display().lines(), ("Enter Password:", ""));
    }

    #[test]
    fn test_history_records_transitions() {
        let (mut controller, t0) = controller();
        type_keys(&mut controller, "1234#", t0);
        controller.handle_tick(secs(t0, 10));

        let history = controller.history().last(10);
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].from, history[0].to), (LockMode::Idle, LockMode::DoorOpen));
        assert_eq!(history[0].at, t0);
        assert_eq!((history[1].from, history[1].to), (LockMode::DoorOpen, LockMode::Idle));
        assert_eq!(history[1].at, secs(t0, 10));
    }
}
