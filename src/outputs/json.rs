//! JSON persistence for page results, the aggregate and the summary.
//!
//! # Output Structure
//!
//! ```text
//! resultados_salesianos_2025/
//! ├── main_page.json
//! ├── futbol.json            # one per sport slug
//! ├── all_data.json          # aggregate read by the report renderer
//! ├── summary.json
//! ├── scraping_log.txt       # see run_log
//! └── debug/
//!     └── futbol.html        # raw page snapshots
//! ```
//!
//! Every write replaces the previous file wholesale.

use crate::error::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `value` as pretty JSON to `dir/filename`, creating `dir` first.
///
/// # Returns
///
/// The path written.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %filename))]
pub async fn write_json<T>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf, AppError>
where
    T: Serialize + ?Sized,
{
    let path = dir.join(filename);
    let json = serde_json::to_string_pretty(value).map_err(|e| AppError::json(&path, e))?;
    write_text(dir, filename, &json).await
}

/// Write `contents` to `dir/filename`, creating `dir` first.
pub async fn write_text(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, AppError> {
    if let Err(e) = fs::create_dir_all(dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create output dir");
        return Err(AppError::io(dir, e));
    }
    let path = dir.join(filename);
    fs::write(&path, contents)
        .await
        .map_err(|e| AppError::io(&path, e))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(path)
}

/// Read and deserialize a JSON file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| AppError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SportPage;

    #[tokio::test]
    async fn writes_pretty_json_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");

        let first = SportPage::failed("Fútbol", "https://example.com/futbol", "boom");
        let path = write_json(&dir, "futbol.json", &first).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"name\": \"Fútbol\""));

        let second = SportPage::failed("Fútbol", "https://example.com/futbol", "again");
        write_json(&dir, "futbol.json", &second).await.unwrap();
        let back: SportPage = read_json(&path).await.unwrap();
        assert_eq!(back.error.as_deref(), Some("again"));
    }

    #[tokio::test]
    async fn reading_missing_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_json::<SportPage>(&tmp.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
