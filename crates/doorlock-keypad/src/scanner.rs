//! Debounced key-press detection.
//!
//! [`MatrixScanner`] turns the raw result of a matrix sweep into at most one
//! key event per poll. Reporting is edge-triggered: a key is reported on the
//! first poll it is seen, then suppressed for as long as it stays held.
//!
//! # Debounce
//!
//! Mechanical contacts chatter for a few milliseconds around both edges of a
//! press. A press only ends once the contact has stayed open for the whole
//! debounce window:
//!
//! - the first open sample after a closure arms a deadline of
//!   `now + debounce`;
//! - if the same key closes again before that deadline, it is still the same
//!   press and is not reported again;
//! - an open sample at or after the deadline ends the press, and the next
//!   closure is a new press.
//!
//! A different key is always a new press.
//!
//! ```text
//! sweep:   '5'  none  '5'  none  none  '5'
//! time:     0   480   490  500   550   560     (debounce 50ms)
//! report:  '5'   -     -    -     -    '5'
//!                ^ bounce       ^ open since 500, press ended
//! ```

use std::time::{Duration, Instant};

use doorlock_core::KeyMap;
use tracing::{debug, trace};

/// Per-scanner mutable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Key of the press in progress, if any.
    pub last_key: Option<char>,

    /// End of the current debounce window. Armed on the press edge and
    /// re-armed on the first open sample of a release.
    pub debounce_deadline: Option<Instant>,

    /// Whether the contact has been seen open since the key last closed.
    pub releasing: bool,
}

/// Converts sweep results into debounced key events.
#[derive(Debug, Clone)]
pub struct MatrixScanner {
    key_map: KeyMap,
    debounce: Duration,
    state: ScanState,
}

impl MatrixScanner {
    /// Create a scanner for `key_map` with the given debounce window.
    pub fn new(key_map: KeyMap, debounce: Duration) -> Self {
        Self {
            key_map,
            debounce,
            state: ScanState::default(),
        }
    }

    /// Key map used to resolve cells.
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Current debounce state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Feed one sweep result and return the key if this is a new press.
    ///
    /// `cell` is the (row, column) of the first active cell of the sweep, or
    /// `None` if nothing was pressed. A cell outside the key map counts as
    /// no key.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use doorlock_core::KeyMap;
    /// use doorlock_keypad::MatrixScanner;
    ///
    /// let mut scanner = MatrixScanner::new(KeyMap::default(), Duration::from_millis(50));
    /// let t0 = Instant::now();
    ///
    /// assert_eq!(scanner.poll(Some((1, 1)), t0), Some('5'));
    /// assert_eq!(scanner.poll(Some((1, 1)), t0 + Duration::from_millis(100)), None);
    /// assert_eq!(scanner.poll(None, t0 + Duration::from_millis(200)), None);
    /// assert_eq!(scanner.poll(None, t0 + Duration::from_millis(250)), None);
    /// assert_eq!(scanner.poll(Some((1, 1)), t0 + Duration::from_millis(300)), Some('5'));
    /// ```
    pub fn poll(&mut self, cell: Option<(usize, usize)>, now: Instant) -> Option<char> {
        let detected = cell.and_then(|(row, col)| self.key_map.get(row, col));
        self.debounce(detected, now)
    }

    /// Forget any held key, as after a power cycle.
    pub fn reset(&mut self) {
        self.state = ScanState::default();
    }

    fn debounce(&mut self, detected: Option<char>, now: Instant) -> Option<char> {
        match (detected, self.state.last_key) {
            (None, None) => None,
            (None, Some(held)) => {
                if !self.state.releasing {
                    self.state.releasing = true;
                    self.state.debounce_deadline = Some(now + self.debounce);
                }

                let settled = self
                    .state
                    .debounce_deadline
                    .is_none_or(|deadline| now >= deadline);
                if settled {
                    trace!(key = %held, "Key released");
                    self.state = ScanState::default();
                } else {
                    trace!(key = %held, "Open contact inside debounce window");
                }
                None
            }
            (Some(key), Some(held)) if key == held => {
                self.state.releasing = false;
                None
            }
            (Some(key), _) => {
                self.state = ScanState {
                    last_key: Some(key),
                    debounce_deadline: Some(now + self.debounce),
                    releasing: false,
                };
                debug!(key = %key, "Key pressed");
                Some(key)
            }
        }
    }
}
