// src/logging.rs
// =============================================================================
// Diagnostics go to stderr through tracing, so stdout only ever carries scan
// results (important for --json).
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set, by -v count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,malurl=info",
        _ => "info,malurl=debug",
    }
}

/// Install the global subscriber. RUST_LOG wins over `verbosity`.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
