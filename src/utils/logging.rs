//! Diagnostic logging.
//!
//! The terminal belongs to the chat UI, so tracing output goes to a file. The
//! filter is read from `SPARK_LOG` and defaults to `spark=info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::io::project_dirs;

pub const LOG_FILTER_ENV: &str = "SPARK_LOG";
pub const DEFAULT_LOG_FILTER: &str = "spark=info";
const LOG_FILE_NAME: &str = "spark.log";

/// Location used when no `--log-file` is given.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global tracing subscriber, appending to `path`.
///
/// Returns the path actually written to. A subscriber that is already
/// installed (for example by a test harness) is left in place.
pub fn init_tracing(
    path: Option<PathBuf>,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(None);
    };
    create_parent_dir(&path)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(path))
}

fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
