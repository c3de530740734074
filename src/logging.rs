//! Tracing setup for the command-line front end.

use anyhow::Context as _;

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`)
pub fn init() -> anyhow::Result<()> {
    init_with_default("info")
}

pub fn init_with_default(default_filter: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
