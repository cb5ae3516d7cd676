//! Landing page scraper.
//!
//! Buckets: announcements, news, schedule, navigation and the overall
//! standings block. Selector lists are ordered from the site's current markup
//! to more generic fallbacks.

use super::NEWS;
use crate::error::ExtractError;
use crate::extract::{Collection, Document, Field, Record};
use crate::models::MainPage;
use crate::utils::timestamp;
use itertools::Itertools;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};

static ANNOUNCEMENTS: Lazy<Collection> = Lazy::new(|| {
    Collection::new(
        &[],
        &[".announcement", ".aviso", ".anuncio", ".alert", ".notice", ".banner-text"],
    )
    .field(Field::text("title", &["h2", "h3", "h4", ".title", ".titulo", "strong"]))
    .field(Field::text("text", &["p", ".text", ".content", ".descripcion"]))
    .field(Field::text("date", &["time", ".date", ".fecha"]))
    .field(Field::url("link", &["a[href]"], "href"))
    .identity(&["title", "text"])
});

static SCHEDULE: Lazy<Collection> = Lazy::new(|| {
    Collection::new(
        &[".schedule", ".calendario", ".horario", "#calendario", ".agenda"],
        &[".schedule-item", ".event", ".evento", "tbody tr", "tr", "li"],
    )
    .field(Field::text("sport", &[".sport", ".deporte"]))
    .field(Field::text(
        "title",
        &[".event-title", ".title", ".titulo", "h3", "h4", "strong", "a", "td:nth-child(2)"],
    ))
    .field(Field::text("date", &["time", ".date", ".fecha", "td:nth-child(1)"]))
    .field(Field::text("time", &[".time", ".hora"]))
    .field(Field::text("location", &[".location", ".lugar", ".venue", ".sede", "td:nth-child(3)"]))
    .field(Field::url("link", &["a[href]"], "href"))
    .identity(&["title"])
});

static NAVIGATION: Lazy<Collection> = Lazy::new(|| {
    Collection::new(&["nav", ".menu", ".navbar", "header"], &["a[href]"])
        .field(Field::text("text", &[]))
        .field(Field::url("href", &[], "href"))
        .identity(&["text"])
});

static STANDINGS: Lazy<Collection> = Lazy::new(|| {
    Collection::new(
        &[".standings", ".clasificacion", ".ranking", "#clasificacion", ".clasificacion-general"],
        &["tbody tr", ".team-row", ".standing-item", "li", "tr"],
    )
    .field(Field::text("position", &[".position", ".pos", ".posicion", "td:nth-child(1)"]))
    .field(Field::text(
        "name",
        &[".team", ".team-name", ".equipo", ".colegio", ".name", "td:nth-child(2)"],
    ))
    .field(Field::text("points", &[".points", ".pts", ".puntos", "td:last-child"]))
    .identity(&["name", "position"])
});

/// Extract the landing page. `url` is both the recorded URL and the base for
/// relative links.
#[instrument(level = "info", skip(html))]
pub fn parse_main_page(html: &str, url: &str) -> Result<MainPage, ExtractError> {
    let doc = Document::parse(html, Some(url))?;

    let navigation: Vec<Record> = doc
        .collection(&NAVIGATION)
        .into_iter()
        .unique_by(|r| (r.cell("text"), r.cell("href")))
        .collect();
    let news: Vec<Record> = doc
        .collection(&NEWS)
        .into_iter()
        .unique_by(|r| (r.cell("title"), r.cell("link")))
        .collect();

    let page = MainPage {
        url: url.to_string(),
        scraped_at: timestamp(),
        title: doc.title(),
        announcements: doc.collection(&ANNOUNCEMENTS),
        news,
        schedule: doc.collection(&SCHEDULE),
        navigation,
        standings: doc.collection(&STANDINGS),
    };
    debug!(
        announcements = page.announcements.len(),
        news = page.news.len(),
        schedule = page.schedule.len(),
        navigation = page.navigation.len(),
        standings = page.standings.len(),
        "Parsed main page"
    );
    Ok(page)
}
