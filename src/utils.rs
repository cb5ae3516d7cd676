//! Utility functions for timestamps, string handling, and file system checks.

use crate::error::AppError;
use chrono::Local;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Current local time as RFC 3339, used for every `scrapedAt` field.
pub fn timestamp() -> String {
    Local::now().to_rfc3339()
}

/// Human-readable local time for report footers and the run log.
pub fn display_time() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Lowercase ASCII slug with Spanish accents folded, e.g. `"Pádel"` → `"padel"`.
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect();
    folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory (idempotently) and then writes and removes a scratch
/// file.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the directory cannot be created or written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), AppError> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    let check_path = path.join("..__write_check__");
    stdfs::File::create(&check_path).map_err(|e| AppError::io(&check_path, e))?;
    let _ = stdfs::remove_file(&check_path);
    info!("Output directory is writable");
    Ok(())
}
