//! `doorlock`: run the keypad door lock against simulated hardware.
//!
//! Type keys on stdin (for example `1234#` then Enter) and watch the virtual
//! LCD on stdout. Logs go to stderr and follow `RUST_LOG` (default `info`).
//! The session ends on Ctrl-C or when stdin closes.

mod input;
mod lock;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use doorlock_core::LockConfig;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::lock::SimulatedLock;

#[derive(Debug, Parser)]
#[command(name = "doorlock", version, about = "Keypad door lock controller (simulated hardware)")]
struct Cli {
    /// TOML configuration file; factory defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LockConfig> {
    match path {
        Some(path) => LockConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            info!("No configuration file given, using factory defaults");
            Ok(LockConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    let key_map = config.key_map()?;
    let poll_interval = config.poll_interval();
    // Each press must span at least one poll, and each release must outlast
    // the debounce window plus one poll.
    let hold = poll_interval * 2 + config.debounce();

    let (mut lock, handle) = SimulatedLock::new(&config)?;

    let feeder = tokio::spawn(input::feed_keys(
        BufReader::new(tokio::io::stdin()),
        handle,
        key_map,
        hold,
    ));

    let shutdown = async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Interrupted");
            }
            result = feeder => match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Keypad input failed: {:#}", e),
                Err(e) => error!("Keypad input task panicked: {}", e),
            },
        }
    };

    lock.run(poll_interval, shutdown).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_config_flag() {
        let cli = Cli::try_parse_from(["doorlock", "--config", "lock.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("lock.toml")));

        let cli = Cli::try_parse_from(["doorlock"]).unwrap();
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/doorlock.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/doorlock.toml"));
    }

    #[test]
    fn test_defaults_without_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config, LockConfig::default());
    }
}
