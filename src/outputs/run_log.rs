//! Append-only plain-text run log (`scraping_log.txt`).
//!
//! This is a product artifact kept across runs, separate from `tracing`
//! output. Each line is prefixed with the local time.

use crate::config::RUN_LOG_FILE;
use crate::error::AppError;
use crate::utils::display_time;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Append one entry to `dir/scraping_log.txt`. Multi-line messages are kept
/// as-is after the timestamp.
pub async fn append(dir: &Path, message: &str) -> Result<(), AppError> {
    fs::create_dir_all(dir).await.map_err(|e| AppError::io(dir, e))?;
    let path = dir.join(RUN_LOG_FILE);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .map_err(|e| AppError::io(&path, e))?;
    let line = format!("[{}] {}\n", display_time(), message);
    file.write_all(line.as_bytes())
        .await
        .map_err(|e| AppError::io(&path, e))?;
    Ok(())
}

/// [`append`], logging instead of failing.
pub async fn note(dir: &Path, message: &str) {
    if let Err(e) = append(dir, message).await {
        warn!(error = %e, "Failed to append to run log");
    }
}
