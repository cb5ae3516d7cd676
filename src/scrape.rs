//! The two phases of a run.
//!
//! - [`run_scrape`]: fetch the main page and every sport page in order, write
//!   one JSON file per page, the aggregate and the summary
//! - [`run_process`]: turn the aggregate into the static reports
//! - [`run_both`]: scrape, then process only if the scrape succeeded
//!
//! Scraping and processing each append to `scraping_log.txt` when they
//! start, finish or fail.

use crate::config::{Config, Sport};
use crate::error::{AppError, error_chain};
use crate::fetch::Fetch;
use crate::models::{Aggregate, MainPage, RunSummary, SportPage};
use crate::outputs::json::{write_json, write_text};
use crate::outputs::reports::{ReportSummary, generate_reports};
use crate::outputs::run_log;
use crate::scrapers::{parse_main_page, parse_sport_page};
use crate::utils::{ensure_writable_dir, timestamp, truncate_for_log};
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Fetch and parse the landing page. Any failure is logged and yields `None`.
async fn scrape_main_page<F: Fetch>(config: &Config, fetcher: &F) -> Option<MainPage> {
    let url = config.main_page_url();
    let html = match fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Main page unavailable; continuing with sports");
            run_log::note(&config.data_dir, &format!("Error en página principal: {e}")).await;
            return None;
        }
    };

    match parse_main_page(&html, &url) {
        Ok(page) => {
            if let Err(e) = write_json(&config.data_dir, "main_page.json", &page).await {
                error!(error = %e, "Failed to write main page JSON");
            }
            run_log::note(&config.data_dir, "Página principal procesada").await;
            Some(page)
        }
        Err(e) => {
            warn!(error = %e, "Main page could not be parsed");
            run_log::note(&config.data_dir, &format!("Error en página principal: {e}")).await;
            None
        }
    }
}

/// Fetch and parse one sport page. Failures become a placeholder.
#[instrument(level = "info", skip_all, fields(sport = %sport.slug))]
async fn scrape_sport<F: Fetch>(config: &Config, fetcher: &F, sport: &Sport) -> SportPage {
    let url = config.sport_url(sport);
    let html = match fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Sport page unavailable");
            return SportPage::failed(&sport.display_name, &url, &e.last_error);
        }
    };
    debug!(preview = %truncate_for_log(&html, 200), "Fetched sport page");

    if config.save_debug_html {
        let filename = format!("{}.html", sport.slug);
        if let Err(e) = write_text(&config.debug_dir(), &filename, &html).await {
            warn!(error = %e, "Failed to save debug HTML");
        }
    }

    match parse_sport_page(&html, sport, &url) {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Sport page could not be parsed");
            SportPage::failed(&sport.display_name, &url, e)
        }
    }
}

async fn scrape_inner<F: Fetch>(config: &Config, fetcher: &F) -> Result<RunSummary, AppError> {
    ensure_writable_dir(&config.data_dir).await?;
    run_log::append(&config.data_dir, "Inicio del scraping").await?;

    let main_page = scrape_main_page(config, fetcher).await;

    let mut sports = Vec::with_capacity(config.sports.len());
    for sport in &config.sports {
        sleep(config.page_delay).await;
        let page = scrape_sport(config, fetcher, sport).await;

        let filename = format!("{}.json", sport.slug);
        if let Err(e) = write_json(&config.data_dir, &filename, &page).await {
            error!(sport = %sport.slug, error = %e, "Failed to write sport JSON");
        }
        let line = match &page.error {
            Some(err) => format!("Error en {}: {}", sport.display_name, err),
            None => format!(
                "{} procesado: {} resultados, {} partidos, {} clasificaciones, {} medalleros",
                sport.display_name,
                page.results.len(),
                page.matches.len(),
                page.standings.len(),
                page.medals.len()
            ),
        };
        info!(sport = %sport.slug, ok = !page.is_error(), "{line}");
        run_log::note(&config.data_dir, &line).await;
        sports.push(page);
    }

    let aggregate = Aggregate {
        scraped_at: timestamp(),
        base_url: config.base_url.clone(),
        main_page,
        sports,
    };
    write_json(&config.data_dir, "all_data.json", &aggregate).await?;

    let summary = RunSummary::from(&aggregate);
    if let Err(e) = write_json(&config.data_dir, "summary.json", &summary).await {
        error!(error = %e, "Failed to write summary JSON");
    }

    run_log::note(
        &config.data_dir,
        &format!(
            "Scraping finalizado: {} deportes correctos, {} con error",
            summary.successful, summary.failed
        ),
    )
    .await;
    Ok(summary)
}

/// Scrape the main page and every configured sport.
///
/// # Errors
///
/// Fails only when the data directory cannot be prepared or `all_data.json`
/// cannot be written. The error and its causes are appended to the run log.
#[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
pub async fn run_scrape<F: Fetch>(config: &Config, fetcher: &F) -> Result<RunSummary, AppError> {
    let t0 = Instant::now();
    match scrape_inner(config, fetcher).await {
        Ok(summary) => {
            info!(
                total = summary.total_sports,
                successful = summary.successful,
                failed = summary.failed,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Scrape finished"
            );
            Ok(summary)
        }
        Err(e) => {
            error!(error = %e, "Scrape failed");
            run_log::note(&config.data_dir, &format!("Error fatal: {}", error_chain(&e))).await;
            Err(e)
        }
    }
}

/// Generate the reports from the last scrape's aggregate.
#[instrument(level = "info", skip_all)]
pub async fn run_process(config: &Config) -> Result<ReportSummary, AppError> {
    match generate_reports(config).await {
        Ok(summary) => {
            run_log::note(
                &config.data_dir,
                &format!(
                    "Reportes generados: {} páginas HTML, {} ficheros CSV",
                    summary.html_pages, summary.csv_files
                ),
            )
            .await;
            Ok(summary)
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            run_log::note(&config.data_dir, &format!("Error fatal: {}", error_chain(&e))).await;
            Err(e)
        }
    }
}

/// Scrape, then generate reports. A failed scrape skips report generation.
pub async fn run_both<F: Fetch>(config: &Config, fetcher: &F) -> Result<(RunSummary, ReportSummary), AppError> {
    let scraped = run_scrape(config, fetcher).await?;
    let reports = run_process(config).await?;
    Ok((scraped, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RUN_LOG_FILE;
    use crate::error::FetchError;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned pages; unknown URLs fail like an exhausted retry.
    struct FixtureFetcher {
        pages: HashMap<String, String>,
    }

    impl Fetch for FixtureFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::new(url, "HTTP status client error (404 Not Found)"))
        }
    }

    const FUTBOL: &str = r#"<html><body>
        <h3>Grupo A</h3>
        <table>
          <tr><th>Local</th><th>Visitante</th><th>Resultado</th></tr>
          <tr><td>Atocha</td><td>Deusto</td><td>2-1</td></tr>
          <tr><td>Triana</td><td>Pamplona</td><td>0-0</td></tr>
        </table>
    </body></html>"#;

    const MAIN: &str = r#"<html><head><title>Juegos Salesianos 2025</title></head>
        <body><article class="news-item"><h3>Inauguración</h3><p>Arrancan los juegos</p></article></body></html>"#;

    fn test_config(root: &std::path::Path) -> Config {
        Config {
            base_url: "https://example.com".to_string(),
            sports: vec![Sport::new("Fútbol", "futbol"), Sport::new("Pádel", "padel")],
            retry_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            ..Config::rooted_at(root)
        }
    }

    fn fetcher(main: bool) -> FixtureFetcher {
        let mut pages = HashMap::new();
        if main {
            pages.insert("https://example.com/".to_string(), MAIN.to_string());
        }
        pages.insert("https://example.com/futbol".to_string(), FUTBOL.to_string());
        FixtureFetcher { pages }
    }

    fn read_json(path: std::path::PathBuf) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn failed_sport_becomes_placeholder_and_run_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        let summary = run_scrape(&config, &fetcher(true)).await.unwrap();
        assert_eq!((summary.total_sports, summary.successful, summary.failed), (2, 1, 1));
        assert!(summary.main_page_scraped);

        let padel = read_json(config.data_dir.join("padel.json"));
        let keys: Vec<_> = padel.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "url", "error"]);

        let summary_json = read_json(config.data_dir.join("summary.json"));
        let padel_summary = &summary_json["sports"][1];
        assert!(padel_summary["error"].as_str().unwrap().contains("404"));
        assert_eq!(padel_summary["resultsCount"], 0);

        let futbol = read_json(config.data_dir.join("futbol.json"));
        assert_eq!(futbol["results"][0]["title"], "Grupo A");
        assert_eq!(futbol["results"][0]["rows"].as_array().unwrap().len(), 2);

        assert!(config.debug_dir().join("futbol.html").exists());
        assert!(config.data_dir.join("main_page.json").exists());
        let log = std::fs::read_to_string(config.data_dir.join(RUN_LOG_FILE)).unwrap();
        assert!(log.contains("Error en Pádel"));
    }

    #[tokio::test]
    async fn missing_main_page_is_recorded_as_null() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        let summary = run_scrape(&config, &fetcher(false)).await.unwrap();
        assert!(!summary.main_page_scraped);
        let aggregate = read_json(config.aggregate_path());
        assert!(aggregate["mainPage"].is_null());
        assert_eq!(aggregate["sports"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn scrape_then_process_writes_reports() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        run_scrape(&config, &fetcher(true)).await.unwrap();
        let report = run_process(&config).await.unwrap();
        assert_eq!(report.failed_writes, 0);
        assert!(config.reports_dir.join("futbol_resultados_1.csv").exists());
        assert!(config.reports_dir.join("padel.html").exists());
        assert!(config.reports_dir.join("index.html").exists());
    }

    #[tokio::test]
    async fn process_without_aggregate_fails_and_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        assert!(run_process(&config).await.is_err());
        let log = std::fs::read_to_string(config.data_dir.join(RUN_LOG_FILE)).unwrap();
        assert!(log.contains("Error fatal"));
    }

    #[tokio::test]
    async fn both_skips_processing_when_scrape_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = Config {
            data_dir: blocker.join("datos"),
            ..test_config(tmp.path())
        };

        assert!(run_both(&config, &fetcher(true)).await.is_err());
        assert!(!config.reports_dir.exists());
    }

    #[tokio::test]
    async fn both_writes_data_and_reports() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        let (scraped, reports) = run_both(&config, &fetcher(true)).await.unwrap();
        assert_eq!(scraped.total_sports, 2);
        assert_eq!(reports.failed_writes, 0);
        assert!(config.aggregate_path().exists());
        assert!(config.reports_dir.join("index.html").exists());
    }
}
