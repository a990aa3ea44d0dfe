use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const LOG_FILE_NAME: &str = "frontend.log";

pub fn log_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE_NAME)
}

pub fn init(root: &Path) -> Result<PathBuf> {
    let log_path = log_path(root);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;
    writeln!(file, "--- {} {} ---", crate::config::PRODUCT_NAME, crate::config::VERSION)
        .with_context(|| format!("write {}", log_path.display()))?;
    Ok(log_path)
}

/// Best-effort: the frontend may sit in a directory it cannot write to,
/// and a missing log line must never block a launch.
pub fn append(root: &Path, line: &str) {
    let log_path = log_path(root);
    if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = writeln!(file, "{line}");
    }
}
