//! Static report generation from `all_data.json`.
//!
//! # Output Structure
//!
//! ```text
//! reportes_salesianos/
//! ├── index.html
//! ├── futbol.html
//! ├── futbol_resultados_1.csv
//! ├── futbol_partidos.csv
//! ├── futbol_clasificacion_1.csv
//! └── futbol_medallero_1.csv
//! ```
//!
//! Rendering reads only the aggregate file, never the network. CSV output is
//! byte-identical across runs for the same aggregate; HTML pages carry a
//! generation timestamp.

use super::csv::{records_to_csv, to_csv, union_keys};
use super::html::{
    Card, cards, error_section, gallery, news_cards, records_to_html_table, render_page, section,
    source_link, sports_overview, to_html_table,
};
use super::json::{read_json, write_text};
use crate::config::Config;
use crate::error::AppError;
use crate::extract::Table;
use crate::models::{Aggregate, MainPage, SportPage, SportSummary};
use crate::utils::{display_time, ensure_writable_dir};
use tracing::{error, info, instrument};

/// What a processing run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub html_pages: usize,
    pub csv_files: usize,
    pub failed_writes: usize,
}

/// CSV files for one sport as `(filename, contents)`, in a stable order.
pub fn sport_csv_files(page: &SportPage) -> Result<Vec<(String, String)>, csv::Error> {
    let slug = page.slug();
    let mut files = Vec::new();

    let mut push_tables = |kind: &str, tables: &[Table]| -> Result<(), csv::Error> {
        for (i, table) in tables.iter().enumerate() {
            files.push((
                format!("{slug}_{kind}_{}.csv", i + 1),
                to_csv(&table.headers, &table.rows)?,
            ));
        }
        Ok(())
    };
    push_tables("resultados", &page.results)?;
    push_tables("clasificacion", &page.standings)?;
    push_tables("medallero", &page.medals)?;

    if !page.matches.is_empty() {
        let headers = union_keys(&page.matches);
        files.push((
            format!("{slug}_partidos.csv"),
            records_to_csv(&page.matches, Some(&headers))?,
        ));
    }
    Ok(files)
}

fn tables_section(heading: &str, tables: &[Table]) -> askama::Result<Option<String>> {
    if tables.is_empty() {
        return Ok(None);
    }
    let inner = tables
        .iter()
        .map(|t| to_html_table(&t.title, &t.headers, &t.rows))
        .collect::<askama::Result<String>>()?;
    section(heading, &inner).map(Some)
}

/// The per-sport HTML page.
pub fn sport_html(page: &SportPage, generated_at: &str) -> askama::Result<String> {
    let mut fragments = vec![source_link(&page.url)?];

    if let Some(error) = &page.error {
        fragments.push(error_section(error)?);
        return render_page(&page.name, &fragments, generated_at);
    }

    fragments.extend(tables_section("Resultados", &page.results)?);
    if !page.matches.is_empty() {
        let headers = union_keys(&page.matches);
        let table = records_to_html_table("Partidos", &page.matches, Some(&headers))?;
        fragments.push(section("Partidos", &table)?);
    }
    fragments.extend(tables_section("Clasificación", &page.standings)?);
    fragments.extend(tables_section("Medallero", &page.medals)?);
    if !page.news.is_empty() {
        fragments.push(section("Noticias", &news_cards(&page.news)?)?);
    }
    if !page.gallery.is_empty() {
        fragments.push(section("Galería", &gallery(&page.gallery)?)?);
    }
    if fragments.len() == 1 {
        fragments.push(section("Sin datos", "<p>No se encontraron datos para este deporte.</p>\n")?);
    }
    render_page(&page.name, &fragments, generated_at)
}

fn main_page_sections(main: &MainPage) -> askama::Result<Vec<String>> {
    let mut out = Vec::new();
    if !main.announcements.is_empty() {
        let announcements: Vec<Card> = main.announcements.iter().map(Card::from_announcement).collect();
        out.push(section("Avisos", &cards(&announcements)?)?);
    }
    if !main.schedule.is_empty() {
        let table = records_to_html_table("Próximos eventos", &main.schedule, Some(&union_keys(&main.schedule)))?;
        out.push(section("Calendario", &table)?);
    }
    if !main.standings.is_empty() {
        let table = records_to_html_table("General", &main.standings, Some(&union_keys(&main.standings)))?;
        out.push(section("Clasificación general", &table)?);
    }
    if !main.news.is_empty() {
        out.push(section("Noticias", &news_cards(&main.news)?)?);
    }
    Ok(out)
}

/// The index page: one row per sport plus the main page highlights.
pub fn index_html(aggregate: &Aggregate, generated_at: &str) -> askama::Result<String> {
    let summaries: Vec<SportSummary> = aggregate.sports.iter().map(SportSummary::from).collect();
    let overview = sports_overview(&aggregate.base_url, &aggregate.scraped_at, &summaries)?;
    let mut fragments = vec![section("Deportes", &overview)?];

    match &aggregate.main_page {
        Some(main) => fragments.extend(main_page_sections(main)?),
        None => fragments.push(error_section("No se pudo obtener la página principal.")?),
    }

    render_page("Juegos Salesianos 2025", &fragments, generated_at)
}

async fn write_counted(config: &Config, filename: &str, contents: &str, summary: &mut ReportSummary) -> bool {
    match write_text(&config.reports_dir, filename, contents).await {
        Ok(_) => true,
        Err(e) => {
            error!(file = %filename, error = %e, "Failed to write report file");
            summary.failed_writes += 1;
            false
        }
    }
}

/// Read the aggregate and write every report file.
///
/// # Errors
///
/// Fails when the aggregate cannot be read, the reports directory cannot be
/// created or a template fails to render. Individual file write failures are
/// logged and counted.
#[instrument(level = "info", skip_all, fields(reports_dir = %config.reports_dir.display()))]
pub async fn generate_reports(config: &Config) -> Result<ReportSummary, AppError> {
    let aggregate: Aggregate = read_json(&config.aggregate_path()).await?;
    ensure_writable_dir(&config.reports_dir).await?;

    let generated_at = display_time();
    let mut summary = ReportSummary::default();

    for page in &aggregate.sports {
        for (filename, contents) in sport_csv_files(page)? {
            if write_counted(config, &filename, &contents, &mut summary).await {
                summary.csv_files += 1;
            }
        }
        let filename = format!("{}.html", page.slug());
        let html = sport_html(page, &generated_at)?;
        if write_counted(config, &filename, &html, &mut summary).await {
            summary.html_pages += 1;
        }
    }

    let index = index_html(&aggregate, &generated_at)?;
    if write_counted(config, "index.html", &index, &mut summary).await {
        summary.html_pages += 1;
    }

    info!(
        html_pages = summary.html_pages,
        csv_files = summary.csv_files,
        failed_writes = summary.failed_writes,
        "Reports generated"
    );
    Ok(summary)
}
