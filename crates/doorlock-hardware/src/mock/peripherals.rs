//! Recording peripherals for testing the access controller.
//!
//! Each mock remembers its current state and every command it received, so
//! tests can assert both the final outcome and the sequence that led there.

use crate::{
    traits::{LockActuator, StatusIndicator, TextDisplay},
    types::IndicatorMode,
};

/// Mock lock actuator.
#[derive(Debug, Clone, Default)]
pub struct MockActuator {
    unlocked: bool,
    commands: Vec<bool>,
}

impl MockActuator {
    /// Create a locked actuator with no recorded commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the door is currently unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Every command received, oldest first.
    pub fn commands(&self) -> &[bool] {
        &self.commands
    }
}

impl LockActuator for MockActuator {
    fn set_actuator(&mut self, unlocked: bool) {
        self.unlocked = unlocked;
        self.commands.push(unlocked);
    }
}

/// Mock status lamp.
#[derive(Debug, Clone)]
pub struct MockIndicator {
    mode: IndicatorMode,
    commands: Vec<IndicatorMode>,
}

impl MockIndicator {
    /// Create a lamp that is off with no recorded commands.
    pub fn new() -> Self {
        Self {
            mode: IndicatorMode::Off,
            commands: Vec::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    /// Every mode received, oldest first.
    pub fn commands(&self) -> &[IndicatorMode] {
        &self.commands
    }
}

impl Default for MockIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusIndicator for MockIndicator {
    fn set_indicator(&mut self, mode: IndicatorMode) {
        self.mode = mode;
        self.commands.push(mode);
    }
}

/// Mock two-line display that keeps the raw text it was given.
#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    frames: Vec<(String, String)>,
}

impl MockDisplay {
    /// Create a display that has shown nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines currently shown, or empty strings before the first frame.
    pub fn lines(&self) -> (&str, &str) {
        self.frames
            .last()
            .map(|(l1, l2)| (l1.as_str(), l2.as_str()))
            .unwrap_or(("", ""))
    }

    /// Every frame shown, oldest first.
    pub fn frames(&self) -> &[(String, String)] {
        &self.frames
    }

    /// Whether any frame showed `text` on either line.
    pub fn has_shown(&self, text: &str) -> bool {
        self.frames
            .iter()
            .any(|(l1, l2)| l1.contains(text) || l2.contains(text))
    }
}

impl TextDisplay for MockDisplay {
    fn display(&mut self, line1: &str, line2: &str) {
        self.frames.push((line1.to_string(), line2.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_actuator_records_commands() {
        let mut actuator = MockActuator::new();
        assert!(!actuator.is_unlocked());

        actuator.set_actuator(true);
        actuator.set_actuator(true);
        actuator.set_actuator(false);

        assert!(!actuator.is_unlocked());
        assert_eq!(actuator.commands(), &[true, true, false]);
    }

    #[test]
    fn test_mock_indicator_records_modes() {
        let mut indicator = MockIndicator::new();
        assert_eq!(indicator.mode(), IndicatorMode::Off);

        indicator.set_indicator(IndicatorMode::Solid);
        indicator.set_indicator(IndicatorMode::Flash { period_ms: 500 });

        assert_eq!(indicator.mode(), IndicatorMode::Flash { period_ms: 500 });
        assert_eq!(indicator.commands().len(), 2);
    }

    #[test]
    fn test_mock_display_frames() {
        let mut display = MockDisplay::new();
        assert_eq!(display.lines(), ("", ""));

        display.display("Enter Password:", "");
        display.display("Enter Password:", "**");

        assert_eq!(display.lines(), ("Enter Password:", "**"));
        assert_eq!(display.frames().len(), 2);
        assert!(display.has_shown("Password"));
        assert!(!display.has_shown("Granted"));
    }
}
