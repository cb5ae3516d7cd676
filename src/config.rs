//! Run configuration.
//!
//! All settings are compiled-in defaults; nothing is read from the
//! environment. Components receive a [`Config`] explicitly so tests can point
//! them at fixture URLs and temporary directories.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL of the event site.
pub const BASE_URL: &str = "https://www.juegossalesianos.com";

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; salesianos_scraper/",
    env!("CARGO_PKG_VERSION"),
    ")"
);
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "es-ES,es;q=0.9,en;q=0.8";

pub const DATA_DIR: &str = "resultados_salesianos_2025";
pub const REPORTS_DIR: &str = "reportes_salesianos";
pub const DEBUG_SUBDIR: &str = "debug";
pub const RUN_LOG_FILE: &str = "scraping_log.txt";

/// A sport discipline published on the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sport {
    pub display_name: String,
    /// Path segment under the base URL; also the stem of every output file.
    pub slug: String,
}

impl Sport {
    pub fn new(display_name: &str, slug: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// The disciplines scraped on every run, in fetch order.
pub fn default_sports() -> Vec<Sport> {
    [
        ("Fútbol", "futbol"),
        ("Fútbol Sala", "futbol-sala"),
        ("Baloncesto", "baloncesto"),
        ("Voleibol", "voleibol"),
        ("Balonmano", "balonmano"),
        ("Atletismo", "atletismo"),
        ("Natación", "natacion"),
        ("Tenis de Mesa", "tenis-de-mesa"),
        ("Pádel", "padel"),
        ("Ajedrez", "ajedrez"),
    ]
    .into_iter()
    .map(|(name, slug)| Sport::new(name, slug))
    .collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub sports: Vec<Sport>,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Per-attempt network timeout.
    pub request_timeout: Duration,
    /// Total attempts per URL, including the first.
    pub max_attempts: usize,
    /// Fixed wait between attempts on the same URL.
    pub retry_delay: Duration,
    /// Fixed wait between consecutive page fetches.
    pub page_delay: Duration,
    pub data_dir: PathBuf,
    pub reports_dir: PathBuf,
    /// Save the raw HTML of every sport page under `data_dir/debug`.
    pub save_debug_html: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            sports: default_sports(),
            user_agent: USER_AGENT.to_string(),
            accept: ACCEPT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            page_delay: Duration::from_millis(1500),
            data_dir: PathBuf::from(DATA_DIR),
            reports_dir: PathBuf::from(REPORTS_DIR),
            save_debug_html: true,
        }
    }
}

impl Config {
    /// Default configuration with both output directories moved under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            data_dir: root.join(DATA_DIR),
            reports_dir: root.join(REPORTS_DIR),
            ..Self::default()
        }
    }

    pub fn main_page_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    pub fn sport_url(&self, sport: &Sport) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), sport.slug)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.data_dir.join(DEBUG_SUBDIR)
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.data_dir.join("all_data.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_urls_join_base_without_double_slash() {
        let config = Config {
            base_url: "https://example.com/".to_string(),
            ..Config::default()
        };
        let sport = Sport::new("Fútbol", "futbol");
        assert_eq!(config.sport_url(&sport), "https://example.com/futbol");
        assert_eq!(config.main_page_url(), "https://example.com/");
    }

    #[test]
    fn rooted_config_moves_output_dirs() {
        let config = Config::rooted_at(Path::new("/tmp/run"));
        assert_eq!(config.data_dir, Path::new("/tmp/run/resultados_salesianos_2025"));
        assert_eq!(config.reports_dir, Path::new("/tmp/run/reportes_salesianos"));
        assert_eq!(config.aggregate_path(), Path::new("/tmp/run/resultados_salesianos_2025/all_data.json"));
    }

    #[test]
    fn default_sport_slugs_are_unique() {
        let sports = default_sports();
        let mut slugs: Vec<_> = sports.iter().map(|s| s.slug.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), sports.len());
    }
}
