//! Sport discipline page scraper.
//!
//! Tables are assigned to exactly one bucket: standings first, then medals,
//! then results take every table left over. Matches, news and gallery are
//! record collections.

use super::NEWS;
use crate::config::Sport;
use crate::error::ExtractError;
use crate::extract::{Claimed, Collection, Document, Field, Record, Selectors, WINNER_MARKERS};
use crate::models::SportPage;
use crate::utils::timestamp;
use itertools::Itertools;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};

static STANDINGS_TABLES: Lazy<Selectors> = Lazy::new(|| {
    Selectors::new(&[
        ".standings table",
        ".clasificacion table",
        "#clasificacion table",
        "table.standings",
        "table.clasificacion",
        "table.ranking",
    ])
});

static MEDAL_TABLES: Lazy<Selectors> = Lazy::new(|| {
    Selectors::new(&[
        ".medals table",
        ".medallero table",
        "#medallero table",
        "table.medals",
        "table.medallero",
    ])
});

static RESULT_TABLES: Lazy<Selectors> = Lazy::new(|| {
    Selectors::new(&[
        ".results table",
        ".resultados table",
        "#resultados table",
        "table.results",
        "table.resultados",
        ".entry-content table",
        "main table",
        "table",
    ])
});

const HOME_SIDE: &[&str] = &[".home", ".home-team", ".team-home", ".local", ".equipo-local"];
const AWAY_SIDE: &[&str] = &[".away", ".away-team", ".team-away", ".visitante", ".equipo-visitante"];

/// Partial scores (sets, periods) listed inside a match.
fn partial_scores() -> Collection {
    Collection::new(&[], &[".set", ".parcial", ".period", "li"])
        .field(Field::text("score", &[]))
        .identity(&["score"])
}

static MATCHES: Lazy<Collection> = Lazy::new(|| {
    Collection::new(&[], &[".match", ".partido", ".fixture", ".game", ".encuentro"])
        .field(Field::text("date", &["time", ".date", ".fecha"]))
        .field(Field::text("time", &[".time", ".hora"]))
        .field(Field::text(
            "phase",
            &[".phase", ".round", ".fase", ".jornada", ".group", ".grupo"],
        ))
        .field(Field::text(
            "home",
            &[".home .team-name", ".home-team", ".team-home", ".local", ".equipo-local", ".home"],
        ))
        .field(Field::text(
            "away",
            &[".away .team-name", ".away-team", ".team-away", ".visitante", ".equipo-visitante", ".away"],
        ))
        .field(Field::text("score", &[".score", ".resultado", ".marcador", ".result"]))
        .field(Field::text("venue", &[".venue", ".location", ".lugar", ".pista", ".sede"]))
        .field(Field::text("status", &[".status", ".estado"]))
        .field(Field::nested("sets", &[".sets", ".parciales", ".periods"], partial_scores()))
        .field(Field::flag("homeWinner", HOME_SIDE, WINNER_MARKERS))
        .field(Field::flag("awayWinner", AWAY_SIDE, WINNER_MARKERS))
        .identity(&["home", "away"])
});

static GALLERY: Lazy<Collection> = Lazy::new(|| {
    Collection::new(
        &[".gallery", ".galeria", ".wp-block-gallery", ".fotos"],
        &[".gallery-item", "figure", "img"],
    )
    .field(Field::image("src", &["img"]))
    .field(Field::attr("alt", &["img"], "alt"))
    .field(Field::text("caption", &["figcaption", ".caption", ".wp-caption-text"]))
    .field(Field::url("link", &["a[href]"], "href"))
    .identity(&["src"])
});

/// Extract one sport page fetched from `url`.
#[instrument(level = "info", skip(html, sport), fields(sport = %sport.slug))]
pub fn parse_sport_page(html: &str, sport: &Sport, url: &str) -> Result<SportPage, ExtractError> {
    let doc = Document::parse(html, Some(url))?;

    let mut claimed = Claimed::new();
    let standings = doc.tables(&STANDINGS_TABLES, &mut claimed);
    let medals = doc.tables(&MEDAL_TABLES, &mut claimed);
    let results = doc.tables(&RESULT_TABLES, &mut claimed);

    let news: Vec<Record> = doc
        .collection(&NEWS)
        .into_iter()
        .unique_by(|r| (r.cell("title"), r.cell("link")))
        .collect();
    let gallery: Vec<Record> = doc
        .collection(&GALLERY)
        .into_iter()
        .unique_by(|r| r.cell("src"))
        .collect();

    let page = SportPage {
        name: sport.display_name.clone(),
        url: url.to_string(),
        error: None,
        scraped_at: Some(timestamp()),
        results,
        matches: doc.collection(&MATCHES),
        standings,
        medals,
        news,
        gallery,
    };
    debug!(
        results = page.results.len(),
        matches = page.matches.len(),
        standings = page.standings.len(),
        medals = page.medals.len(),
        news = page.news.len(),
        gallery = page.gallery.len(),
        "Parsed sport page"
    );
    Ok(page)
}
