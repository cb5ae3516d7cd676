//! Declarative field and collection specs, and the per-field algorithm.
//!
//! A [`Field`] names one value and lists candidate selectors in priority
//! order. A [`Collection`] turns every matching item element into a
//! [`Record`], keeping only records whose identity fields came out non-empty.

use super::dom::{self, Selectors};
use super::record::{FieldValue, Record};
use scraper::ElementRef;
use std::collections::HashSet;
use tracing::trace;
use url::Url;

/// Class-name fragments that mark the winning side of a match.
pub const WINNER_MARKERS: &[&str] = &["winner", "ganador", "victoria", "won"];

#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Normalized text content.
    Text,
    /// Raw attribute value.
    Attr(&'static str),
    /// Attribute holding a link, resolved against the page URL.
    Url(&'static str),
    /// True when the matched element carries a marker class or `data-winner`.
    Flag(&'static [&'static str]),
    /// `src` (or lazy-load `data-src`) of the matched `img`, or of the first
    /// `img` nested inside the matched element.
    Image,
    /// A nested collection evaluated with the matched element as its scope.
    Collection(Box<Collection>),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    selectors: Selectors,
    kind: FieldKind,
}

impl Field {
    pub fn new(name: &'static str, selectors: &[&str], kind: FieldKind) -> Self {
        Self {
            name,
            selectors: Selectors::new(selectors),
            kind,
        }
    }

    pub fn text(name: &'static str, selectors: &[&str]) -> Self {
        Self::new(name, selectors, FieldKind::Text)
    }

    pub fn attr(name: &'static str, selectors: &[&str], attr: &'static str) -> Self {
        Self::new(name, selectors, FieldKind::Attr(attr))
    }

    pub fn url(name: &'static str, selectors: &[&str], attr: &'static str) -> Self {
        Self::new(name, selectors, FieldKind::Url(attr))
    }

    pub fn flag(name: &'static str, selectors: &[&str], markers: &'static [&'static str]) -> Self {
        Self::new(name, selectors, FieldKind::Flag(markers))
    }

    pub fn image(name: &'static str, selectors: &[&str]) -> Self {
        Self::new(name, selectors, FieldKind::Image)
    }

    pub fn nested(name: &'static str, selectors: &[&str], collection: Collection) -> Self {
        Self::new(name, selectors, FieldKind::Collection(Box::new(collection)))
    }

    /// Evaluate this field inside `scope`. Misses produce empty values.
    pub fn extract(&self, scope: ElementRef<'_>, base: Option<&Url>) -> FieldValue {
        let matched = dom::select_first(scope, &self.selectors);
        match &self.kind {
            FieldKind::Text => FieldValue::Text(matched.map(dom::text).unwrap_or_default()),
            FieldKind::Attr(name) => {
                FieldValue::Text(matched.map(|el| dom::attr(el, name)).unwrap_or_default())
            }
            FieldKind::Url(name) => FieldValue::Text(
                matched
                    .map(|el| resolve_url(&dom::attr(el, name), base))
                    .unwrap_or_default(),
            ),
            FieldKind::Flag(markers) => FieldValue::Flag(matched.is_some_and(|el| is_flagged(&el, markers))),
            FieldKind::Image => FieldValue::Text(
                matched
                    .and_then(image_source)
                    .map(|src| resolve_url(&src, base))
                    .unwrap_or_default(),
            ),
            FieldKind::Collection(collection) => FieldValue::Records(
                matched
                    .map(|el| collection.extract(el, base))
                    .unwrap_or_default(),
            ),
        }
    }
}

fn is_flagged(el: &ElementRef<'_>, markers: &[&str]) -> bool {
    if dom::has_class_marker(el, markers) {
        return true;
    }
    matches!(
        el.value().attr("data-winner").map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes" | "si" | "sí")
    )
}

fn image_source(el: ElementRef<'_>) -> Option<String> {
    let img = if dom::tag_name(&el) == "img" {
        el
    } else {
        el.descendants().filter_map(ElementRef::wrap).find(|d| dom::tag_name(d) == "img")?
    };
    ["src", "data-src", "data-lazy-src"]
        .iter()
        .map(|name| dom::attr(img, name))
        .find(|v| !v.is_empty())
}

/// Resolve `href` against `base`. Fragment-only and `javascript:` links are
/// treated as absent.
pub fn resolve_url(href: &str, base: Option<&Url>) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return String::new();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

/// A repeated group of records: container elements, item elements inside
/// them, and the fields of each item.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    containers: Selectors,
    items: Selectors,
    fields: Vec<Field>,
    identity: Vec<&'static str>,
}

impl Collection {
    /// `containers` may be empty, in which case items are searched directly
    /// inside the scope. Empty `items` makes each container its own item.
    pub fn new(containers: &[&str], items: &[&str]) -> Self {
        Self {
            containers: Selectors::new(containers),
            items: Selectors::new(items),
            fields: Vec::new(),
            identity: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// A record is kept only when at least one of these fields is non-empty.
    /// With no identity fields, any non-empty record is kept.
    pub fn identity(mut self, fields: &[&'static str]) -> Self {
        self.identity = fields.to_vec();
        self
    }

    pub fn accepts(&self, record: &Record) -> bool {
        if self.identity.is_empty() {
            !record.is_empty()
        } else {
            self.identity.iter().any(|key| record.contains_key(key))
        }
    }

    /// Build one record from `item` using every field, in declared order.
    pub fn record(&self, item: ElementRef<'_>, base: Option<&Url>) -> Record {
        self.fields
            .iter()
            .fold(Record::builder(), |builder, field| {
                builder.value(field.name, field.extract(item, base))
            })
            .build()
    }

    pub fn extract(&self, scope: ElementRef<'_>, base: Option<&Url>) -> Vec<Record> {
        let containers = if self.containers.is_empty() {
            vec![scope]
        } else {
            dom::select_all(scope, &self.containers)
        };

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for container in containers {
            let items = if self.items.is_empty() {
                vec![container]
            } else {
                dom::select_all(container, &self.items)
            };
            for item in items {
                if !seen.insert(item.id()) {
                    continue;
                }
                let record = self.record(item, base);
                if self.accepts(&record) {
                    records.push(record);
                } else {
                    trace!(fields = record.len(), "Discarding record without identity fields");
                }
            }
        }
        records
    }
}
