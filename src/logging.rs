//! Diagnostic logging to stderr.
//!
//! The filter comes from `PINGCLI_LOG` (same syntax as `RUST_LOG`). Without
//! it, `-v` raises the level from warnings to info, debug, then trace.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "PINGCLI_LOG";

pub fn init(verbosity: u8, ansi: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to initialize logging: {err}"))
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "pingcli=warn",
        1 => "pingcli=info",
        2 => "pingcli=debug",
        _ => "pingcli=trace",
    }
}
