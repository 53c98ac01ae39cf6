pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{KeypadConfig, LockConfig};
pub use error::{Error, Result};
pub use types::*;
