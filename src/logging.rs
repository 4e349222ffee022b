//! Log setup. The TUI owns the terminal, so events go to a file in the data
//! directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "contact-book.log";
const DEFAULT_FILTER: &str = "info";

/// Install a global `tracing` subscriber appending to `dir/contact-book.log`.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("failed to create log directory")?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context("failed to open log file")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_events_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_logging(dir.path()).unwrap();
        tracing::error!("hello from the test");

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("hello from the test"));
    }
}
