//! Selector-fallback extraction of records and tables from loosely
//! structured HTML.
//!
//! Page scrapers describe *what* to pull out as data ([`Field`],
//! [`Collection`], table selector lists); this module owns *how*:
//!
//! - selectors are tried in declared order, the first one that matches wins
//! - text is whitespace-collapsed and trimmed
//! - a missing element is a soft miss and yields an empty value
//! - records lacking every identity field are dropped as noise
//! - empty values never enter a [`Record`]
//!
//! The only hard failure is blank input.

pub mod dom;
pub mod field;
pub mod record;
pub mod table;

pub use dom::Selectors;
pub use field::{Collection, Field, WINNER_MARKERS};
pub use record::{FieldValue, Record};
pub use table::Table;

use crate::error::ExtractError;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Tracks table elements already assigned to a bucket so that one table is
/// never reported twice.
pub type Claimed = HashSet<ego_tree::NodeId>;

/// A parsed page plus the URL its relative links resolve against.
pub struct Document {
    html: Html,
    base: Option<Url>,
}

impl Document {
    /// Parse `markup`. `base_url` may be omitted for fixtures; links are then
    /// kept as written.
    ///
    /// Only blank input is rejected. A page with an empty body parses to a
    /// document whose buckets all come out empty.
    pub fn parse(markup: &str, base_url: Option<&str>) -> Result<Self, ExtractError> {
        if markup.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }
        let html = Html::parse_document(markup);
        Ok(Self {
            html,
            base: base_url.and_then(|u| Url::parse(u).ok()),
        })
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// `<title>`, falling back to the first `<h1>`.
    pub fn title(&self) -> String {
        match Field::text("title", &["title"]).extract(self.root(), None) {
            FieldValue::Text(t) if !t.is_empty() => t,
            _ => Field::text("title", &["h1"])
                .extract(self.root(), None)
                .as_text()
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn collection(&self, collection: &Collection) -> Vec<Record> {
        collection.extract(self.root(), self.base())
    }

    /// Extract every unclaimed table matched by the first selector in
    /// `selectors` that matches any, and claim them.
    pub fn tables(&self, selectors: &Selectors, claimed: &mut Claimed) -> Vec<Table> {
        let candidates = dom::select_all_where(self.root(), selectors, |el| {
            dom::tag_name(el) == "table" && !claimed.contains(&el.id())
        });

        let mut tables = Vec::new();
        for el in candidates {
            claimed.insert(el.id());
            if let Some(table) = Table::extract(el, tables.len() + 1) {
                tables.push(table);
            }
        }
        tables
    }
}
