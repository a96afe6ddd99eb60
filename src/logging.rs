//! Tracing subscriber setup for the `covida` binary.
//!
//! Logs go to stderr so stdout stays clean for results and JSON output.
//! `RUST_LOG` takes precedence over the configured filter.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise `configured`.
pub fn build_filter(configured: &str) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => Ok(EnvFilter::try_new(from_env)?),
        _ => Ok(EnvFilter::try_new(configured)?),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(configured: &str) -> Result<()> {
    let filter = build_filter(configured)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}
