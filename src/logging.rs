use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "tasklist.log";

/// `RUST_LOG` wins over the configured level; a bad level falls back to `warn`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// CLI logging: stderr, so stdout stays clean for `--json`
pub fn init_stderr(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(level))
        .with_target(false)
        .try_init();
}

/// TUI logging: append to `<home>/tasklist.log` so the screen is left alone.
/// Logging is skipped when the file cannot be opened.
pub fn init_file(home: &Path, level: &str) {
    if fs::create_dir_all(home).is_err() {
        return;
    }
    let path = home.join(LOG_FILE);
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(env_filter(level))
        .with_ansi(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(path = ?path, "tui logging initialized");
    }
}
