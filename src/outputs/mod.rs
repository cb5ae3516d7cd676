//! Everything the tool writes to disk.
//!
//! # Submodules
//!
//! - [`json`]: page results, the aggregate and the summary as pretty JSON
//! - [`run_log`]: the append-only `scraping_log.txt`
//! - [`csv`]: tables and record lists as CSV text
//! - [`html`]: escaped HTML fragments and the page template
//! - [`reports`]: the processing phase, from `all_data.json` to
//!   `reportes_salesianos/`

pub mod csv;
pub mod html;
pub mod json;
pub mod reports;
pub mod run_log;
