//! Pin-backed peripheral drivers.
//!
//! These adapters implement the peripheral traits on top of the pin
//! capabilities, so the same controller runs against real GPIO or against
//! [`MockPin`](crate::mock::MockPin) lines.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    traits::{LockActuator, OutputPin, StatusIndicator},
    types::IndicatorMode,
};

/// Relay-driven lock. Energizing the relay releases the door.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::devices::RelayActuator;
/// use doorlock_hardware::mock::MockPin;
/// use doorlock_hardware::traits::LockActuator;
///
/// let coil = MockPin::new(false);
/// let mut relay = RelayActuator::new(coil.clone());
/// relay.set_actuator(true);
/// assert!(coil.level());
/// ```
#[derive(Debug)]
pub struct RelayActuator<P: OutputPin> {
    pin: P,
    unlocked: bool,
}

impl<P: OutputPin> RelayActuator<P> {
    /// Take ownership of the relay line and de-energize it.
    pub fn new(mut pin: P) -> Self {
        pin.write(false);
        Self {
            pin,
            unlocked: false,
        }
    }

    /// Whether the relay is currently energized.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

impl<P: OutputPin> LockActuator for RelayActuator<P> {
    fn set_actuator(&mut self, unlocked: bool) {
        if unlocked != self.unlocked {
            debug!(unlocked, "Relay switched");
        }
        self.unlocked = unlocked;
        self.pin.write(unlocked);
    }
}

/// Status lamp that can flash without a dedicated timer thread.
///
/// Flashing is a single level flip. It can be driven two ways:
///
/// - call [`toggle`](Self::toggle) from a periodic callback firing every
///   [`IndicatorMode::toggle_interval`]; the callback only flips one level;
/// - or call [`update`](Self::update) from the main loop, which re-arms its
///   own deadline against the monotonic clock.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use doorlock_hardware::devices::FlashingIndicator;
/// use doorlock_hardware::mock::MockPin;
/// use doorlock_hardware::traits::StatusIndicator;
/// use doorlock_hardware::types::IndicatorMode;
///
/// let lamp = MockPin::new(false);
/// let mut indicator = FlashingIndicator::new(lamp.clone());
///
/// let start = Instant::now();
/// indicator.set_indicator(IndicatorMode::Flash { period_ms: 500 });
/// indicator.update(start);
/// assert!(lamp.level());
///
/// indicator.update(start + Duration::from_millis(250));
/// assert!(!lamp.level());
/// ```
#[derive(Debug)]
pub struct FlashingIndicator<P: OutputPin> {
    pin: P,
    mode: IndicatorMode,
    level: bool,
    next_toggle: Option<Instant>,
}

impl<P: OutputPin> FlashingIndicator<P> {
    /// Take ownership of the lamp line and switch it off.
    pub fn new(mut pin: P) -> Self {
        pin.write(false);
        Self {
            pin,
            mode: IndicatorMode::Off,
            level: false,
            next_toggle: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    /// Current lamp level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Flip the lamp if flashing. Safe to call from a periodic callback.
    pub fn toggle(&mut self) {
        if self.mode.is_flashing() {
            self.level = !self.level;
            self.pin.write(self.level);
        }
    }

    /// Advance flashing against the monotonic clock.
    ///
    /// The first call after entering a flashing mode arms the deadline;
    /// later calls toggle once per elapsed interval. If the loop fell more
    /// than one interval behind, the phase restarts from `now` instead of
    /// toggling repeatedly to catch up.
    pub fn update(&mut self, now: Instant) {
        let Some(interval) = self.mode.toggle_interval() else {
            return;
        };

        match self.next_toggle {
            None => self.next_toggle = Some(now + interval),
            Some(deadline) if now >= deadline => {
                self.toggle();
                let next = deadline + interval;
                self.next_toggle = Some(if next <= now { now + interval } else { next });
            }
            Some(_) => {}
        }
    }

    /// Time until the next scheduled toggle, if armed.
    pub fn time_until_toggle(&self, now: Instant) -> Option<Duration> {
        self.next_toggle
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl<P: OutputPin> StatusIndicator for FlashingIndicator<P> {
    fn set_indicator(&mut self, mode: IndicatorMode) {
        if mode == self.mode {
            return;
        }
        debug!(from = %self.mode, to = %mode, "Indicator mode changed");

        self.mode = mode;
        self.next_toggle = None;
        self.level = !matches!(mode, IndicatorMode::Off);
        self.pin.write(self.level);
    }
}
