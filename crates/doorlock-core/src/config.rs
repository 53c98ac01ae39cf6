//! Start-up configuration for the door lock controller.
//!
//! The configuration is read once, validated, and never reloaded. Missing
//! fields fall back to the defaults in [`constants`](crate::constants), so an
//! empty file yields the factory configuration.
//!
//! # Example
//!
//! ```
//! use doorlock_core::LockConfig;
//!
//! let config = LockConfig::from_toml_str(
//!     r#"
//!     password = "2580"
//!     lockout_duration_ms = 60000
//!
//!     [keypad]
//!     rows = 4
//!     cols = 3
//!     layout = ["123", "456", "789", "*0#"]
//!
//!     [keys]
//!     info = "1"
//!     "#,
//! );
//! // The info key may not be a digit.
//! assert!(config.is_err());
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    KeyBindings, KeyMap, Password, Result,
    constants::{
        DEFAULT_COLS, DEFAULT_DEBOUNCE_MS, DEFAULT_FAST_FLASH_PERIOD_MS, DEFAULT_FLASH_PERIOD_MS,
        DEFAULT_LAYOUT, DEFAULT_LOCKOUT_DURATION_MS, DEFAULT_MAX_FAILED_ATTEMPTS,
        DEFAULT_MAX_PASSWORD_LENGTH, DEFAULT_MESSAGE_DURATION_MS, DEFAULT_OPEN_DURATION_MS,
        DEFAULT_POLL_INTERVAL_MS, DEFAULT_ROWS,
    },
    error::Error,
};

/// Keypad geometry and character layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeypadConfig {
    /// Number of row lines driven by the scanner.
    pub rows: usize,

    /// Number of column lines sampled by the scanner.
    pub cols: usize,

    /// One string per row; each character is the key at that column.
    pub layout: Vec<String>,
}

impl KeypadConfig {
    /// Build the key map, checking it against the declared geometry.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyMap` if the layout is malformed or its size
    /// differs from `rows` x `cols`.
    pub fn key_map(&self) -> Result<KeyMap> {
        let map = KeyMap::from_rows(&self.layout)?;
        if map.rows() != self.rows || map.cols() != self.cols {
            return Err(Error::InvalidKeyMap(format!(
                "layout is {}x{}, but keypad is declared {}x{}",
                map.rows(),
                map.cols(),
                self.rows,
                self.cols
            )));
        }
        Ok(map)
    }
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            layout: DEFAULT_LAYOUT.iter().map(|row| row.to_string()).collect(),
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// The single accepted password.
    pub password: Password,

    /// Capacity of the input buffer in digits.
    pub max_password_length: usize,

    /// Consecutive failures before lockout.
    pub max_failed_attempts: u32,

    pub open_duration_ms: u64,
    pub lockout_duration_ms: u64,
    pub debounce_ms: u64,
    pub message_duration_ms: u64,
    pub flash_period_ms: u64,
    pub fast_flash_period_ms: u64,
    pub poll_interval_ms: u64,

    pub keypad: KeypadConfig,
    pub keys: KeyBindings,
}

impl LockConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns `Error::ConfigParse` for malformed TOML or unknown fields, and
    /// any error from [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Check every start-up invariant.
    ///
    /// A configuration that fails here would make the state machine unsafe
    /// to run, so callers abort initialization on error.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.max_password_length == 0 {
            return Err(Error::Config(
                "max_password_length must be at least 1".to_string(),
            ));
        }
        if self.password.len() > self.max_password_length {
            return Err(Error::InvalidPassword(format!(
                "password has {} digits, but at most {} can be entered",
                self.password.len(),
                self.max_password_length
            )));
        }
        if self.max_failed_attempts == 0 {
            return Err(Error::Config(
                "max_failed_attempts must be at least 1".to_string(),
            ));
        }
        if self.flash_period_ms < 2 || self.fast_flash_period_ms < 2 {
            return Err(Error::Config(
                "flash periods must be at least 2 ms".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        let map = self.keypad.key_map()?;
        self.keys.validate()?;
        self.keys.validate_against(&map)?;

        if let Some(missing) = self.password.unreachable_digits(&map).next() {
            return Err(Error::InvalidPassword(format!(
                "password digit '{}' is not on the keypad",
                missing
            )));
        }

        Ok(())
    }

    /// Build the validated key map.
    ///
    /// # Errors
    /// See [`KeypadConfig::key_map`].
    pub fn key_map(&self) -> Result<KeyMap> {
        self.keypad.key_map()
    }

    /// How long the door stays unlocked after a correct password.
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }

    /// How long input is ignored after too many wrong passwords.
    pub fn lockout_duration(&self) -> Duration {
        Duration::from_millis(self.lockout_duration_ms)
    }

    /// Debounce window for the keypad scanner.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// How long a transient notice stays on the display.
    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    /// Full on-off period of the indicator flash while the door is open.
    pub fn flash_period(&self) -> Duration {
        Duration::from_millis(self.flash_period_ms)
    }

    /// Full on-off period of the indicator flash in fast mode.
    pub fn fast_flash_period(&self) -> Duration {
        Duration::from_millis(self.fast_flash_period_ms)
    }

    /// Delay between keypad sweeps in the run loop.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            password: Password::default(),
            max_password_length: DEFAULT_MAX_PASSWORD_LENGTH,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            open_duration_ms: DEFAULT_OPEN_DURATION_MS,
            lockout_duration_ms: DEFAULT_LOCKOUT_DURATION_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            message_duration_ms: DEFAULT_MESSAGE_DURATION_MS,
            flash_period_ms: DEFAULT_FLASH_PERIOD_MS,
            fast_flash_period_ms: DEFAULT_FAST_FLASH_PERIOD_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            keypad: KeypadConfig::default(),
            keys: KeyBindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        let config = LockConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.password.matches("1234"));
        assert_eq!(config.max_password_length, 8);
        assert_eq!(config.max_failed_attempts, 3);
        assert_eq!(config.open_duration(), Duration::from_secs(10));
        assert_eq!(config.lockout_duration(), Duration::from_secs(30));
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.key_map().unwrap(), KeyMap::default());
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = LockConfig::from_toml_str("").unwrap();
        assert_eq!(config, LockConfig::default());
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = LockConfig::from_toml_str(
            r##"
            password = "2580"
            max_failed_attempts = 5
            open_duration_ms = 3000

            [keys]
            submit = "D"
            status = "#"
            "##,
        )
        .unwrap();

        assert!(config.password.matches("2580"));
        assert_eq!(config.max_failed_attempts, 5);
        assert_eq!(config.open_duration_ms, 3000);
        assert_eq!(config.lockout_duration_ms, DEFAULT_LOCKOUT_DURATION_MS);
        assert_eq!(config.keys.submit, 'D');
        assert_eq!(config.keys.status, '#');
    }

    #[test]
    fn test_custom_keypad_layout() {
        let config = LockConfig::from_toml_str(
            r#"
            [keypad]
            rows = 2
            cols = 8
            layout = ["0123*#AB", "4567CD89"]
            "#,
        )
        .unwrap();

        let map = config.key_map().unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 8);
        assert_eq!(map.get(1, 7), Some('9'));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = LockConfig::from_toml_str("pasword = \"1234\"");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_non_numeric_password_rejected() {
        let result = LockConfig::from_toml_str("password = \"12ab\"");
        assert!(result.is_err());
    }

    #[rstest]
    #[case("max_password_length = 0")]
    #[case("max_password_length = 3")]
    #[case("max_failed_attempts = 0")]
    #[case("flash_period_ms = 1")]
    #[case("poll_interval_ms = 0")]
    #[case("[keypad]\nrows = 3")]
    #[case("[keypad]\nlayout = []")]
    #[case("[keypad]\nlayout = [\"123A\", \"456B\", \"789C\", \"*0#1\"]")]
    #[case("[keys]\nclear = \"#\"")]
    #[case("[keys]\ninfo = \"X\"")]
    fn test_invalid_configuration(#[case] document: &str) {
        assert!(LockConfig::from_toml_str(document).is_err());
    }

    #[rstest]
    #[case::digit_missing("password = \"1230\"\n[keypad]\nlayout = [\"123A\", \"456B\", \"789C\", \"*E#D\"]")]
    #[case::no_digits("[keypad]\nlayout = [\"EFGA\", \"HIJB\", \"KLMC\", \"*N#D\"]")]
    fn test_password_must_be_typeable(#[case] document: &str) {
        let result = LockConfig::from_toml_str(document);
        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[test]
    fn test_password_on_custom_layout_accepted() {
        let config = LockConfig::from_toml_str(
            "password = \"123\"\n[keypad]\nlayout = [\"123A\", \"456B\", \"789C\", \"*E#D\"]",
        )
        .unwrap();
        assert!(config.password.matches("123"));
    }

    #[test]
    fn test_zero_durations_are_allowed() {
        let config = LockConfig::from_toml_str(
            "open_duration_ms = 0\nlockout_duration_ms = 0\ndebounce_ms = 0",
        )
        .unwrap();
        assert!(config.open_duration().is_zero());
        assert!(config.lockout_duration().is_zero());
    }

    #[test]
    fn test_missing_file() {
        let result = LockConfig::from_file("/nonexistent/doorlock.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
