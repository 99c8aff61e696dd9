//! Tracing setup for the editor binary

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Honours `RUST_LOG`; defaults to info-level output on stderr so log
/// lines never mix with exported/dumped table data on stdout.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
