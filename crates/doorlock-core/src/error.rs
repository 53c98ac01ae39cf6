use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Keypad errors
    #[error("Invalid key map: {0}")]
    InvalidKeyMap(String),

    #[error("Invalid key binding: {0}")]
    InvalidKeyBinding(String),

    // Credential errors
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
