//! Controller state and mode transitions.
//!
//! # Modes
//!
//! - `Idle`: accepting digits and command keys
//! - `DoorOpen`: lock released until the open deadline
//! - `LockedOut`: input ignored until the lockout deadline
//!
//! # Valid Transitions
//!
//! - Idle → DoorOpen (correct password)
//! - Idle → LockedOut (too many wrong passwords)
//! - DoorOpen → Idle (open deadline reached)
//! - LockedOut → Idle (lockout deadline reached)

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Maximum number of mode transitions kept in history.
///
/// Each record is a few dozen bytes; 100 covers about fifty unlock or
/// lockout cycles, which is plenty for diagnosing a misbehaving door.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Operating mode of the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Waiting for a password.
    Idle,

    /// Door unlocked; input ignored.
    DoorOpen,

    /// Too many failures; input ignored.
    LockedOut,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode_str = match self {
            LockMode::Idle => "Idle",
            LockMode::DoorOpen => "DoorOpen",
            LockMode::LockedOut => "LockedOut",
        };
        write!(f, "{}", mode_str)
    }
}

impl LockMode {
    /// Check if transition to `target` is allowed from this mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_controller::LockMode;
    ///
    /// assert!(LockMode::Idle.can_transition_to(&LockMode::DoorOpen));
    /// assert!(!LockMode::DoorOpen.can_transition_to(&LockMode::LockedOut));
    /// ```
    pub fn can_transition_to(&self, target: &LockMode) -> bool {
        matches!(
            (self, target),
            (LockMode::Idle, LockMode::DoorOpen | LockMode::LockedOut)
                | (LockMode::DoorOpen, LockMode::Idle)
                | (LockMode::LockedOut, LockMode::Idle)
        )
    }

    /// Whether key presses are processed in this mode.
    pub fn accepts_input(&self) -> bool {
        matches!(self, LockMode::Idle)
    }
}

/// Mode together with the deadline that is only meaningful in that mode.
///
/// Keeping the deadline inside the variant means an open deadline and a
/// lockout deadline can never both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    DoorOpen { deadline: Instant },
    LockedOut { deadline: Instant },
}

impl Phase {
    pub(crate) fn mode(&self) -> LockMode {
        match self {
            Phase::Idle => LockMode::Idle,
            Phase::DoorOpen { .. } => LockMode::DoorOpen,
            Phase::LockedOut { .. } => LockMode::LockedOut,
        }
    }
}

/// Everything the controller knows about the current session.
///
/// Created once in `Idle` with an empty buffer and zero failed attempts,
/// then mutated only by the controller's transition functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub(crate) phase: Phase,
    pub(crate) input: String,
    pub(crate) failed_attempts: u32,
}

impl ControllerState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            input: String::new(),
            failed_attempts: 0,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> LockMode {
        self.phase.mode()
    }

    /// Digits entered so far. Only ever non-empty while idle.
    pub fn input_buffer(&self) -> &str {
        &self.input
    }

    /// Number of digits entered so far.
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Consecutive wrong submissions since the last success or lockout.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// When the door relocks, if it is open.
    pub fn open_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::DoorOpen { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// When the lockout ends, if locked out.
    pub fn lockout_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::LockedOut { deadline } => Some(deadline),
            _ => None,
        }
    }
}

/// A single mode transition with timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    /// The mode transitioned from.
    pub from: LockMode,

    /// The mode transitioned to.
    pub to: LockMode,

    /// Monotonic time of the transition.
    pub at: Instant,
}

/// Bounded log of recent mode transitions.
#[derive(Debug, Clone)]
pub struct TransitionHistory {
    entries: VecDeque<ModeTransition>,
}

impl TransitionHistory {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub(crate) fn record(&mut self, transition: ModeTransition) {
        self.entries.push_back(transition);
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ModeTransition> {
        self.entries.iter()
    }

    /// The last `count` transitions, oldest first.
    pub fn last(&self, count: usize) -> Vec<ModeTransition> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).copied().collect()
    }
}
