//! Thin query layer over `scraper`.
//!
//! The extractor only ever needs four operations: first match from a
//! selector fallback list, all matches from a fallback list, normalized text,
//! and attribute values. Everything else in [`crate::extract`] is written
//! against these.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::fmt;
use tracing::warn;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// An ordered list of compiled CSS selectors, tried first to last.
///
/// Selectors that fail to parse are logged and left out; they behave as if
/// they matched nothing.
#[derive(Clone, Default)]
pub struct Selectors {
    compiled: Vec<(String, Selector)>,
}

impl Selectors {
    pub fn new(sources: &[&str]) -> Self {
        let compiled = sources
            .iter()
            .filter_map(|src| match Selector::parse(src) {
                Ok(sel) => Some((src.to_string(), sel)),
                Err(e) => {
                    warn!(selector = %src, error = %e, "Ignoring invalid selector");
                    None
                }
            })
            .collect();
        Self { compiled }
    }

    /// True when no selector was declared (or none compiled).
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.compiled.iter().map(|(_, sel)| sel)
    }
}

impl fmt::Debug for Selectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.compiled.iter().map(|(src, _)| src))
            .finish()
    }
}

/// First element matched by the first selector that matches anything.
///
/// Each selector is tried against the descendants of `scope`; when it has no
/// descendant match the scope element itself is a candidate. An empty list
/// resolves to the scope.
pub fn select_first<'a>(scope: ElementRef<'a>, selectors: &Selectors) -> Option<ElementRef<'a>> {
    if selectors.is_empty() {
        return Some(scope);
    }
    selectors.iter().find_map(|sel| {
        scope
            .select(sel)
            .next()
            .or_else(|| sel.matches(&scope).then_some(scope))
    })
}

/// Every descendant matched by the first selector that yields at least one
/// element accepted by `keep`. Selectors are never merged.
pub fn select_all_where<'a, P>(scope: ElementRef<'a>, selectors: &Selectors, mut keep: P) -> Vec<ElementRef<'a>>
where
    P: FnMut(&ElementRef<'a>) -> bool,
{
    for sel in selectors.iter() {
        let found: Vec<_> = scope.select(sel).filter(|el| keep(el)).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

pub fn select_all<'a>(scope: ElementRef<'a>, selectors: &Selectors) -> Vec<ElementRef<'a>> {
    select_all_where(scope, selectors, |_| true)
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_string()
}

/// Normalized text content of an element.
pub fn text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Attribute value, trimmed; empty when absent.
pub fn attr(el: ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).map(str::trim).unwrap_or_default().to_string()
}

pub fn tag_name<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub fn is_heading(el: &ElementRef<'_>) -> bool {
    matches!(tag_name(el), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// True when any class of `el` contains one of `markers`, case-insensitively.
pub fn has_class_marker(el: &ElementRef<'_>, markers: &[&str]) -> bool {
    el.value().classes().any(|class| {
        let class = class.to_ascii_lowercase();
        markers.iter().any(|m| class.contains(&m.to_ascii_lowercase()))
    })
}

/// Nearest ancestor element with the given tag name.
pub fn closest_ancestor<'a>(el: &ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| tag_name(a) == tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const HTML: &str = r#"
        <div id="scope">
            <p class="b">  second
               choice </p>
            <p class="c">third</p>
            <a class="link" href=" /x ">go</a>
        </div>"#;

    #[test]
    fn first_matching_selector_wins_in_declared_order() {
        let doc = Html::parse_document(HTML);
        let root = doc.root_element();
        let sels = Selectors::new(&[".missing", ".b", ".c"]);
        let el = select_first(root, &sels).unwrap();
        assert_eq!(text(el), "second choice");
    }

    #[test]
    fn fallback_equals_selecting_with_the_matching_selector_alone() {
        let doc = Html::parse_document(HTML);
        let root = doc.root_element();
        let with_fallback = select_first(root, &Selectors::new(&[".nope", ".c"])).map(text);
        let alone = select_first(root, &Selectors::new(&[".c"])).map(text);
        assert_eq!(with_fallback, alone);
    }

    #[test]
    fn invalid_selectors_are_skipped() {
        let sels = Selectors::new(&["div[", ".c"]);
        assert_eq!(sels.len(), 1);
    }

    #[test]
    fn select_all_does_not_merge_selectors() {
        let doc = Html::parse_document(HTML);
        let found = select_all(doc.root_element(), &Selectors::new(&["p.c", "p"]));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn scope_itself_is_a_candidate_without_descendant_match() {
        let doc = Html::parse_document(HTML);
        let link = select_first(doc.root_element(), &Selectors::new(&["a.link"])).unwrap();
        let same = select_first(link, &Selectors::new(&["a"])).unwrap();
        assert_eq!(attr(same, "href"), "/x");
    }

    #[test]
    fn clean_text_collapses_and_trims() {
        assert_eq!(clean_text("  a \n\t b\u{a0}\u{a0}c  "), "a b c");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn missing_attribute_is_empty() {
        let doc = Html::parse_document(HTML);
        let p = select_first(doc.root_element(), &Selectors::new(&["p"])).unwrap();
        assert_eq!(attr(p, "href"), "");
    }
}
