//! Logging bootstrap.
//!
//! The terminal belongs to the UI, so logs go to a file or nowhere.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "tui_stage=info";

/// Filter from `RUST_LOG`, with the crate default appended unless the
/// variable already mentions it.
pub fn filter_directive(rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        None | Some("") => DEFAULT_DIRECTIVE.to_string(),
        Some(env) if env.contains("tui_stage") => env.to_string(),
        Some(env) => format!("{env},{DEFAULT_DIRECTIVE}"),
    }
}

/// Install the global subscriber writing to `log_path` (appending).
///
/// With no path this is a no-op. Returns whether a subscriber was installed.
pub fn init(log_path: Option<&Path>) -> Result<bool> {
    let Some(path) = log_path else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(filter_directive(rust_log.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
    Ok(true)
}
