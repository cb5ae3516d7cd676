//! HTML fragments and the page template used by the reports.
//!
//! Rendering goes through `askama` templates under `templates/`, which escape
//! every interpolated value. Only already-rendered fragments are inserted
//! with `|safe`.

use crate::extract::Record;
use crate::models::SportSummary;
use askama::Template;

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    fragments: &'a [String],
    generated_at: &'a str,
}

#[derive(Template)]
#[template(path = "table.html")]
struct TableTemplate<'a> {
    title: &'a str,
    headers: &'a [String],
    rows: &'a [Vec<String>],
}

#[derive(Template)]
#[template(path = "cards.html")]
struct CardsTemplate<'a> {
    cards: &'a [Card],
}

#[derive(Template)]
#[template(path = "gallery.html")]
struct GalleryTemplate<'a> {
    photos: &'a [Photo],
}

#[derive(Template)]
#[template(path = "section.html")]
struct SectionTemplate<'a> {
    heading: &'a str,
    inner: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "source.html")]
struct SourceTemplate<'a> {
    url: &'a str,
}

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate<'a> {
    base_url: &'a str,
    scraped_at: &'a str,
    rows: Vec<OverviewRow<'a>>,
}

struct OverviewRow<'a> {
    slug: &'a str,
    name: &'a str,
    status: String,
    results_count: usize,
    matches_count: usize,
    standings_count: usize,
    medals_count: usize,
}

/// One news item or announcement. Empty fields are left out of the card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub title: String,
    pub link: String,
    pub date: String,
    pub summary: String,
}

impl Card {
    pub fn from_news(record: &Record) -> Self {
        Self {
            title: record.cell("title"),
            link: record.cell("link"),
            date: record.cell("date"),
            summary: record.cell("summary"),
        }
    }

    pub fn from_announcement(record: &Record) -> Self {
        Self {
            title: record.cell("title"),
            link: record.cell("link"),
            date: record.cell("date"),
            summary: record.cell("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Photo {
    src: String,
    alt: String,
    caption: String,
}

/// A titled `<table>` fragment. `headers` may be empty.
pub fn to_html_table(title: &str, headers: &[String], rows: &[Vec<String>]) -> askama::Result<String> {
    TableTemplate { title, headers, rows }.render()
}

/// Records as a table; headers default to the first record's keys.
pub fn records_to_html_table(
    title: &str,
    records: &[Record],
    headers: Option<&[String]>,
) -> askama::Result<String> {
    let headers: Vec<String> = match headers {
        Some(h) => h.to_vec(),
        None => records
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default(),
    };
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| headers.iter().map(|h| r.cell(h)).collect())
        .collect();
    to_html_table(title, &headers, &rows)
}

pub fn cards(cards: &[Card]) -> askama::Result<String> {
    CardsTemplate { cards }.render()
}

/// News records as cards with optional link and date.
pub fn news_cards(records: &[Record]) -> askama::Result<String> {
    let cards: Vec<Card> = records.iter().map(Card::from_news).collect();
    CardsTemplate { cards: &cards }.render()
}

/// Gallery records with a `src`; the rest are skipped.
pub fn gallery(records: &[Record]) -> askama::Result<String> {
    let photos: Vec<Photo> = records
        .iter()
        .filter_map(|r| {
            r.get_str("src").map(|src| Photo {
                src: src.to_string(),
                alt: r.cell("alt"),
                caption: r.cell("caption"),
            })
        })
        .collect();
    GalleryTemplate { photos: &photos }.render()
}

/// Wrap an already-rendered `inner` fragment in a titled `<section>`.
pub fn section(heading: &str, inner: &str) -> askama::Result<String> {
    SectionTemplate { heading, inner }.render()
}

pub fn error_section(message: &str) -> askama::Result<String> {
    ErrorTemplate { message }.render()
}

pub fn source_link(url: &str) -> askama::Result<String> {
    SourceTemplate { url }.render()
}

/// Per-sport status table for the index page.
pub fn sports_overview(base_url: &str, scraped_at: &str, sports: &[SportSummary]) -> askama::Result<String> {
    let rows = sports
        .iter()
        .map(|s| OverviewRow {
            slug: &s.slug,
            name: &s.name,
            status: match &s.error {
                Some(e) => format!("Error: {e}"),
                None => "OK".to_string(),
            },
            results_count: s.results_count,
            matches_count: s.matches_count,
            standings_count: s.standings_count,
            medals_count: s.medals_count,
        })
        .collect();
    OverviewTemplate { base_url, scraped_at, rows }.render()
}

/// Full HTML document around `fragments`. Fragments are inserted verbatim.
pub fn render_page(title: &str, fragments: &[String], generated_at: &str) -> askama::Result<String> {
    PageTemplate { title, fragments, generated_at }.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_escaped() {
        let html = to_html_table("T", &["h".to_string()], &[vec!["<b>x</b>".to_string()]]).unwrap();
        assert!(html.contains("<td>&lt;b&gt;x&lt;/b&gt;</td>"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn quotes_and_ampersands_are_escaped() {
        let html = error_section(r#"a & "b" 'c'"#).unwrap();
        assert!(html.contains("a &amp; &quot;b&quot;"));
        assert!(!html.contains("'c'"));
    }

    #[test]
    fn headerless_table_has_no_thead() {
        let html = to_html_table("Tabla 1", &[], &[vec!["1".to_string()]]).unwrap();
        assert!(!html.contains("<thead>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn record_table_uses_first_record_keys() {
        let records = vec![Record::builder().text("home", "Atocha").text("away", "Deusto").build()];
        let html = records_to_html_table("Partidos", &records, None).unwrap();
        assert!(html.contains("<th>home</th><th>away</th>"));
        assert!(html.contains("<td>Atocha</td><td>Deusto</td>"));
    }

    #[test]
    fn page_wraps_fragments_and_escapes_title() {
        let page = render_page("A & B", &["<p>uno</p>".to_string()], "2025-05-01 10:00:00").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("<p>uno</p>"));
        assert!(page.contains("Generado el 2025-05-01 10:00:00"));
    }

    #[test]
    fn news_cards_escape_links() {
        let records = vec![Record::builder()
            .text("title", "<script>")
            .text("link", "https://x.test/?a=1&b=2")
            .build()];
        let html = news_cards(&records).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("a=1&amp;b=2"));
    }

    #[test]
    fn gallery_skips_records_without_source() {
        let records = vec![
            Record::builder().text("src", "https://x.test/1.jpg").text("alt", "Podio").build(),
            Record::builder().text("alt", "sin foto").build(),
        ];
        let html = gallery(&records).unwrap();
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains("alt=\"Podio\""));
    }
}
