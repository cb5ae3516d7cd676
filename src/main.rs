//! # Salesianos Scraper
//!
//! Downloads the public pages of the Salesian Games 2025 website, extracts
//! results, fixtures, standings, medal tables, news and galleries, and turns
//! them into static HTML and CSV reports.
//!
//! ## Usage
//!
//! ```sh
//! salesianos_scraper scrape    # write resultados_salesianos_2025/
//! salesianos_scraper process   # write reportes_salesianos/
//! salesianos_scraper both
//! salesianos_scraper           # interactive prompt
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: main page, then each sport in order, with pacing and retries
//! 2. **Extraction**: ordered selector fallbacks per field, tables by bucket
//! 3. **Persistence**: one JSON file per page, `all_data.json`, `summary.json`
//! 4. **Reporting**: `all_data.json` rendered to HTML pages and CSV files

use clap::Parser;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod scrape;
mod scrapers;
mod utils;

use cli::{Cli, Command, HELP_TEXT, parse_line};
use config::Config;
use models::RunSummary;
use outputs::reports::ReportSummary;
use scrape::{run_both, run_process, run_scrape};

/// Whether the interactive loop should keep reading commands.
enum Flow {
    Continue,
    Exit,
}

fn report_scrape(config: &Config, summary: &RunSummary) {
    println!(
        "Scraping completado: {}/{} deportes correctos. Datos en {}",
        summary.successful,
        summary.total_sports,
        config.data_dir.display()
    );
}

fn report_process(config: &Config, summary: &ReportSummary) {
    println!(
        "Reportes generados en {} ({} HTML, {} CSV)",
        config.reports_dir.display(),
        summary.html_pages,
        summary.csv_files
    );
}

#[instrument(level = "info", skip(config))]
async fn execute(command: Command, config: &Config) -> Result<Flow, Box<dyn Error>> {
    match command {
        Command::Scrape => {
            let fetcher = fetch::http_with_retry(config)?;
            report_scrape(config, &run_scrape(config, &fetcher).await?);
        }
        Command::Process => report_process(config, &run_process(config).await?),
        Command::Both => {
            let fetcher = fetch::http_with_retry(config)?;
            let (scraped, reports) = run_both(config, &fetcher).await?;
            report_scrape(config, &scraped);
            report_process(config, &reports);
        }
        Command::Help => println!("{HELP_TEXT}"),
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

/// Read commands from stdin until `exit` or end of input.
async fn interactive(config: &Config) -> Result<(), Box<dyn Error>> {
    println!("Scraper Juegos Salesianos 2025");
    println!("{HELP_TEXT}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(_) => {
                println!("Comando no reconocido: {}", line.trim());
                println!("{HELP_TEXT}");
                continue;
            }
        };
        match execute(command, config).await {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                error!(error = %e, ?command, "Command failed");
                println!("Error: {e}");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let config = Config::default();
    info!(command = ?args.command, base_url = %config.base_url, "salesianos_scraper starting up");

    let result = match args.command {
        Some(command) => execute(command, &config).await.map(|_| ()),
        None => interactive(&config).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Run failed");
    }
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "salesianos_scraper finished");
    result
}
