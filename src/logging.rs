use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file. Unset means no logging.
pub const LOG_ENV: &str = "VENDOR_BOUNCE_LOG";
const DEFAULT_FILTER: &str = "vendor_bounce=debug";

/// Install a plain-text file subscriber when `VENDOR_BOUNCE_LOG` is set.
///
/// The player owns the alternate screen, so logs never go to stderr.
pub fn init() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
