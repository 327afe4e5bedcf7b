//! Logging init: structured `tracing` output on stderr.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,linkprobe_server=debug,linkprobe_core=debug";

/// Install the global subscriber.
///
/// An explicit `directives` string wins; otherwise `RUST_LOG` is used, then
/// the built-in default.
pub fn init_logging(directives: Option<&str>) -> Result<()> {
    let env_filter = match directives {
        Some(d) => EnvFilter::new(d),
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
