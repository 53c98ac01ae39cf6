//! Common types shared across hardware device implementations.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Requested behaviour of the status indicator.
///
/// The lamp is solid while the door is locked and flashes while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    /// Lamp off.
    Off,

    /// Lamp on continuously.
    Solid,

    /// Lamp toggles every half period.
    Flash {
        /// Full on/off period in milliseconds.
        period_ms: u64,
    },
}

impl IndicatorMode {
    /// Create a flashing mode from a period.
    pub fn flash(period: Duration) -> Self {
        Self::Flash {
            period_ms: period.as_millis() as u64,
        }
    }

    /// Check if this mode flashes.
    pub fn is_flashing(&self) -> bool {
        matches!(self, Self::Flash { .. })
    }

    /// Interval between level changes, if flashing.
    ///
    /// A period shorter than 2 ms is clamped to toggle every millisecond.
    pub fn toggle_interval(&self) -> Option<Duration> {
        match self {
            Self::Flash { period_ms } => Some(Duration::from_millis((*period_ms / 2).max(1))),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Off"),
            Self::Solid => write!(f, "Solid"),
            Self::Flash { period_ms } => write!(f, "Flash({period_ms}ms)"),
        }
    }
}
