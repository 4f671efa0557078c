//! File logger backed by `tracing-subscriber`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_DIR_NAME: &str = "logs";
pub const LOG_FILE_NAME: &str = "cohctl.log";

/// Path of the log file inside `config_dir`.
pub fn log_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_DIR_NAME).join(LOG_FILE_NAME)
}

/// Install the process-wide subscriber writing to `<config_dir>/logs/cohctl.log`.
///
/// Returns the log path, or `None` when the file could not be opened or a
/// subscriber is already installed. Logging failures never abort a command.
pub fn init_logging(config_dir: &Path, debug: bool) -> Option<PathBuf> {
    let path = log_file_path(config_dir);
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
        .ok()?;

    let level = if debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok()?;
    tracing::debug!(log = %path.display(), "logging initialized");
    Some(path)
}
