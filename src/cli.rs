//! Command-line interface definitions.
//!
//! The same commands are accepted as the first argument or, when the tool is
//! started without one, typed one per line at the interactive prompt.

use clap::{Parser, Subcommand};

/// Scraper and report generator for the Salesian Games 2025 website.
///
/// # Examples
///
/// ```sh
/// # Download every page, then build the reports
/// salesianos_scraper both
///
/// # Interactive prompt
/// salesianos_scraper
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch the site and write the JSON results
    Scrape,
    /// Build HTML and CSV reports from the last scrape
    Process,
    /// Scrape, then process if the scrape succeeded
    Both,
    /// Show the available commands
    Help,
    /// Leave the interactive prompt
    Exit,
}

pub const HELP_TEXT: &str = "\
Comandos disponibles:
  scrape   Descarga la web y guarda los resultados en JSON
  process  Genera los reportes HTML y CSV a partir del último scraping
  both     Ejecuta scrape y después process
  help     Muestra esta ayuda
  exit     Sale del programa";

/// Parse one line typed at the interactive prompt.
///
/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    let argv = std::iter::once(env!("CARGO_PKG_NAME")).chain(words);
    Cli::try_parse_from(argv).map(|cli| cli.command)
}
