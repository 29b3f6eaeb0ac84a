//! Logging setup
//!
//! Human-readable output by default, JSON with `--log-json`. `RUST_LOG`
//! overrides the level given on the command line. Logs go to stderr so
//! `--json` output on stdout stays parseable.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber
///
/// # Arguments
/// * `level` - default filter (e.g. "info", "stylist_session=debug")
/// * `json_format` - structured JSON lines instead of pretty text
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
