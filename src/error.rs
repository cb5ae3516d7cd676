//! Error types for fetching, extraction and orchestration.
//!
//! Only orchestration-level failures ever reach `main`. Everything below that
//! (a missing field, an empty table, a sport page that never loads) degrades
//! to empty or placeholder data instead of an error.

use std::path::PathBuf;
use thiserror::Error;

/// A page could not be fetched after the retry budget was exhausted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to fetch {url}: {last_error}")]
pub struct FetchError {
    /// The URL that was requested.
    pub url: String,
    /// Description of the failure seen on the last attempt.
    pub last_error: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, last_error: impl ToString) -> Self {
        Self {
            url: url.into(),
            last_error: last_error.to_string(),
        }
    }
}

/// Hard extraction failures. Missing data is never one of these.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document is empty")]
    EmptyDocument,
}

/// Fatal errors raised by the scrape and process runs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to render report template: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        AppError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Render an error together with its `source()` chain, one cause per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        out.push_str("\n  caused by: ");
        out.push_str(&c.to_string());
        cause = c.source();
    }
    out
}
