use crate::{
    Result,
    constants::{
        DEFAULT_CLEAR_KEY, DEFAULT_INFO_KEY, DEFAULT_LAYOUT, DEFAULT_PASSWORD,
        DEFAULT_RESET_ATTEMPTS_KEY, DEFAULT_STATUS_KEY, DEFAULT_SUBMIT_KEY,
        DEFAULT_TOGGLE_FLASH_KEY,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use subtle::ConstantTimeEq;

/// Fixed mapping from a (row, column) cell of the keypad matrix to a character.
///
/// The map is rectangular, non-empty and every character appears exactly
/// once. It is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    rows: usize,
    cols: usize,
    keys: Vec<char>,
}

impl KeyMap {
    /// Build a key map from one string per row.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyMap` if the layout is empty, ragged, or
    /// contains a duplicated character.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::KeyMap;
    ///
    /// let map = KeyMap::from_rows(&["12", "34"]).unwrap();
    /// assert_eq!(map.get(1, 0), Some('3'));
    /// assert!(KeyMap::from_rows(&["12", "3"]).is_err());
    /// ```
    pub fn from_rows<S: AsRef<str>>(layout: &[S]) -> Result<Self> {
        let rows = layout.len();
        if rows == 0 {
            return Err(Error::InvalidKeyMap("layout has no rows".to_string()));
        }

        let cols = layout[0].as_ref().chars().count();
        if cols == 0 {
            return Err(Error::InvalidKeyMap("layout has no columns".to_string()));
        }

        let mut keys = Vec::with_capacity(rows * cols);
        let mut seen = HashSet::with_capacity(rows * cols);

        for (index, row) in layout.iter().enumerate() {
            let row = row.as_ref();
            let width = row.chars().count();
            if width != cols {
                return Err(Error::InvalidKeyMap(format!(
                    "row {index} has {width} keys, expected {cols}"
                )));
            }
            for key in row.chars() {
                if key.is_control() {
                    return Err(Error::InvalidKeyMap(format!(
                        "row {index} contains a control character"
                    )));
                }
                if !seen.insert(key) {
                    return Err(Error::InvalidKeyMap(format!("key '{key}' is mapped twice")));
                }
                keys.push(key);
            }
        }

        Ok(Self { rows, cols, keys })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Character at the given cell, or `None` if the cell is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.keys.get(row * self.cols + col).copied()
    }

    /// Cell holding `key`, if the key is on the map.
    #[must_use]
    pub fn position(&self, key: char) -> Option<(usize, usize)> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .map(|index| (index / self.cols, index % self.cols))
    }

    /// Whether `key` appears anywhere on the map.
    #[must_use]
    pub fn contains(&self, key: char) -> bool {
        self.keys.contains(&key)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            rows: DEFAULT_LAYOUT.len(),
            cols: DEFAULT_LAYOUT[0].len(),
            keys: DEFAULT_LAYOUT.iter().flat_map(|row| row.chars()).collect(),
        }
    }
}

/// Meaning of a key press for the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Submit the entered digits for validation.
    Submit,

    /// Discard the entered digits.
    Clear,

    /// Show firmware banner and failed attempt count.
    Info,

    /// Switch between normal and fast unlock flashing.
    ToggleFlash,

    /// Zero the failed attempt counter.
    ResetAttempts,

    /// Show whether the door is closed, open or locked out.
    Status,
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(_) => write!(f, "Digit"),
            Self::Submit => write!(f, "Submit"),
            Self::Clear => write!(f, "Clear"),
            Self::Info => write!(f, "Info"),
            Self::ToggleFlash => write!(f, "ToggleFlash"),
            Self::ResetAttempts => write!(f, "ResetAttempts"),
            Self::Status => write!(f, "Status"),
        }
    }
}

/// Characters bound to the command keys.
///
/// Digits `0`-`9` are always digits; the bindings decide which of the
/// remaining characters act as commands. Any other character is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyBindings {
    pub submit: char,
    pub clear: char,
    pub info: char,
    pub toggle_flash: char,
    pub reset_attempts: char,
    pub status: char,
}

impl KeyBindings {
    /// Translate a reported key into an action.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::{KeyAction, KeyBindings};
    ///
    /// let bindings = KeyBindings::default();
    /// assert_eq!(bindings.classify('7'), Some(KeyAction::Digit(7)));
    /// assert_eq!(bindings.classify('#'), Some(KeyAction::Submit));
    /// assert_eq!(bindings.classify('x'), None);
    /// ```
    #[must_use]
    pub fn classify(&self, key: char) -> Option<KeyAction> {
        if let Some(d) = key.to_digit(10) {
            return Some(KeyAction::Digit(d as u8));
        }
        self.pairs()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| action)
    }

    /// Check that no binding is a digit and that all bindings are distinct.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyBinding` describing the first conflict.
    pub fn validate(&self) -> Result<()> {
        let pairs = self.pairs();
        let mut seen = HashSet::with_capacity(pairs.len());
        for (key, action) in pairs {
            if key.is_ascii_digit() {
                return Err(Error::InvalidKeyBinding(format!(
                    "{action} cannot be bound to digit '{key}'"
                )));
            }
            if !seen.insert(key) {
                return Err(Error::InvalidKeyBinding(format!(
                    "'{key}' is bound to more than one command"
                )));
            }
        }
        Ok(())
    }

    /// Check that every command key exists on `map`.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyBinding` naming the first missing key.
    pub fn validate_against(&self, map: &KeyMap) -> Result<()> {
        for (key, action) in self.pairs() {
            if !map.contains(key) {
                return Err(Error::InvalidKeyBinding(format!(
                    "{action} key '{key}' is not on the keypad"
                )));
            }
        }
        Ok(())
    }

    fn pairs(&self) -> [(char, KeyAction); 6] {
        [
            (self.submit, KeyAction::Submit),
            (self.clear, KeyAction::Clear),
            (self.info, KeyAction::Info),
            (self.toggle_flash, KeyAction::ToggleFlash),
            (self.reset_attempts, KeyAction::ResetAttempts),
            (self.status, KeyAction::Status),
        ]
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            submit: DEFAULT_SUBMIT_KEY,
            clear: DEFAULT_CLEAR_KEY,
            info: DEFAULT_INFO_KEY,
            toggle_flash: DEFAULT_TOGGLE_FLASH_KEY,
            reset_attempts: DEFAULT_RESET_ATTEMPTS_KEY,
            status: DEFAULT_STATUS_KEY,
        }
    }
}

/// Numeric password held in memory.
///
/// # Security
/// Comparison is constant-time so the time a rejection takes does not leak
/// how many leading digits were correct. The value is redacted from `Debug`
/// output so it never reaches the logs.
#[derive(Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Password(String);

impl Password {
    /// Create a new password.
    ///
    /// # Errors
    /// Returns `Error::InvalidPassword` if the password is empty or contains
    /// anything other than ASCII digits.
    pub fn new(digits: &str) -> Result<Self> {
        if digits.is_empty() {
            return Err(Error::InvalidPassword("password is empty".to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPassword(
                "password must contain digits only".to_string(),
            ));
        }
        Ok(Password(digits.to_string()))
    }

    /// Number of digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an empty password cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digits that cannot be typed on `map`.
    pub(crate) fn unreachable_digits<'a>(
        &'a self,
        map: &'a KeyMap,
    ) -> impl Iterator<Item = char> + 'a {
        self.0.chars().filter(|digit| !map.contains(*digit))
    }

    /// Constant-time comparison against entered digits.
    #[must_use]
    pub fn matches(&self, entered: &str) -> bool {
        self.0.as_bytes().ct_eq(entered.as_bytes()).into()
    }
}

impl Default for Password {
    fn default() -> Self {
        Password(DEFAULT_PASSWORD.to_string())
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(<{} digits>)", self.0.len())
    }
}

impl TryFrom<String> for Password {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Password::new(&value)
    }
}

impl From<Password> for String {
    fn from(value: Password) -> Self {
        value.0
    }
}

impl std::str::FromStr for Password {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Password::new(s)
    }
}
