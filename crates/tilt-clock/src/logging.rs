//! Log setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `tilt_clock=debug`.
pub const LOG_ENV: &str = "TILT_CLOCK_LOG";

const LOG_FILE: &str = "tilt-clock.log";

/// Install the global subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    match log_path().and_then(|path| open(&path).map(|file| (path, file))) {
        Some((path, file)) => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::info!(path = %path.display(), "tilt-clock starting");
        }
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tilt-clock").map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}

fn open(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
