//! Logging setup. Logs go to stderr so stdout carries only JSON.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `log_level`.
///
/// An unparseable filter falls back to `info` rather than failing the run.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
