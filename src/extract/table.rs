//! HTML table extraction with caption recovery.
//!
//! Tables on the site rarely carry a `<caption>`. The title is recovered in
//! this order:
//!
//! 1. a heading among the few element siblings right before the table
//! 2. the table's own `<caption>`
//! 3. the nearest earlier heading inside one of the enclosing blocks
//! 4. a synthesized `Tabla N`
//!
//! Both searches are bounded by [`MAX_SIBLING_SCAN`] and [`MAX_ANCESTOR_DEPTH`].

use super::dom::{self, Selectors};
use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Element siblings inspected before the table when looking for a heading.
pub const MAX_SIBLING_SCAN: usize = 3;
/// Enclosing blocks inspected when looking for a category heading.
pub const MAX_ANCESTOR_DEPTH: usize = 4;

const BLOCK_HEADINGS: &[&str] = &[
    "h1, h2, h3, h4, h5, h6",
    ".category-title, .titulo-categoria, .section-title, .widget-title",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Extract `table`. `ordinal` (1-based) numbers the synthesized title.
    ///
    /// Returns `None` when the table has no non-empty data row.
    pub fn extract(table: ElementRef<'_>, ordinal: usize) -> Option<Table> {
        let rows: Vec<ElementRef<'_>> = own_rows(table);

        let header_row = rows
            .iter()
            .copied()
            .find(|tr| dom::closest_ancestor(tr, "thead").is_some())
            .or_else(|| rows.first().copied().filter(|tr| is_header_row(*tr)));

        let headers: Vec<String> = header_row
            .map(|tr| cells(tr).into_iter().map(dom::text).collect())
            .unwrap_or_default();

        let width = headers.len();
        let body: Vec<Vec<String>> = rows
            .iter()
            .copied()
            .filter(|tr| Some(tr.id()) != header_row.map(|h| h.id()))
            .filter(|tr| dom::closest_ancestor(tr, "thead").is_none())
            .map(|tr| cells(tr).into_iter().map(dom::text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|mut row| {
                if width > 0 {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        if body.is_empty() {
            return None;
        }

        Some(Table {
            title: title_for(table, ordinal),
            headers,
            rows: body,
        })
    }
}

/// `tr` elements that belong to `table` itself, not to a nested table.
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let Ok(tr) = Selector::parse("tr") else {
        return Vec::new();
    };
    table
        .select(&tr)
        .filter(|row| dom::closest_ancestor(row, "table").map(|t| t.id()) == Some(table.id()))
        .collect()
}

fn cells(tr: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(dom::tag_name(c), "td" | "th"))
        .collect()
}

fn is_header_row(tr: ElementRef<'_>) -> bool {
    let cells = cells(tr);
    !cells.is_empty() && cells.iter().all(|c| dom::tag_name(c) == "th")
}

fn title_for(table: ElementRef<'_>, ordinal: usize) -> String {
    preceding_heading(table)
        .or_else(|| caption(table))
        .or_else(|| block_heading(table))
        .unwrap_or_else(|| format!("Tabla {ordinal}"))
}

fn looks_like_heading(el: &ElementRef<'_>) -> bool {
    dom::is_heading(el) || dom::has_class_marker(el, &["title", "titulo", "heading"])
}

fn preceding_heading(table: ElementRef<'_>) -> Option<String> {
    for sibling in table
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .take(MAX_SIBLING_SCAN)
    {
        if dom::tag_name(&sibling) == "table" {
            break;
        }
        if looks_like_heading(&sibling) {
            let text = dom::text(sibling);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn caption(table: ElementRef<'_>) -> Option<String> {
    let caption = dom::select_first(table, &Selectors::new(&["caption"]))?;
    let text = dom::text(caption);
    (!text.is_empty() && dom::tag_name(&caption) == "caption").then_some(text)
}

fn block_heading(table: ElementRef<'_>) -> Option<String> {
    let headings = Selectors::new(BLOCK_HEADINGS);
    table
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| !matches!(dom::tag_name(a), "body" | "html"))
        .take(MAX_ANCESTOR_DEPTH)
        .find_map(|block| heading_before(block, table, &headings))
}

/// Nearest heading inside `block` that comes before `table` in document order.
fn heading_before(block: ElementRef<'_>, table: ElementRef<'_>, headings: &Selectors) -> Option<String> {
    let preceding: HashSet<NodeId> = block
        .descendants()
        .take_while(|n| n.id() != table.id())
        .map(|n| n.id())
        .collect();
    dom::select_all_where(block, headings, |h| {
        preceding.contains(&h.id())
            && !h.descendants().any(|d| d.id() == table.id())
            && dom::closest_ancestor(h, "table").is_none()
            && !dom::text(*h).is_empty()
    })
    .last()
    .map(|h| dom::text(*h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_table(doc: &Html) -> ElementRef<'_> {
        dom::select_first(doc.root_element(), &Selectors::new(&["table"])).unwrap()
    }

    #[test]
    fn captionless_table_takes_preceding_heading() {
        let doc = Html::parse_document(
            r#"<div>
                 <h3>Standings</h3>
                 <table>
                   <tr><th>Pos</th><th>Equipo</th><th>Pts</th></tr>
                   <tr><td>1</td><td>Salesianos Atocha</td><td>9</td></tr>
                   <tr><td>2</td><td>Salesianos Deusto</td></tr>
                 </table>
               </div>"#,
        );
        let table = Table::extract(first_table(&doc), 1).unwrap();
        assert_eq!(table.title, "Standings");
        assert_eq!(table.headers, vec!["Pos", "Equipo", "Pts"]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
        assert_eq!(table.rows[1], vec!["2", "Salesianos Deusto", ""]);
    }

    #[test]
    fn caption_used_when_no_heading_precedes() {
        let doc = Html::parse_document(
            r#"<p>texto</p><table><caption> Grupo  B </caption>
               <thead><tr><th>Equipo</th></tr></thead>
               <tbody><tr><td>Pizarrales</td></tr></tbody></table>"#,
        );
        let table = Table::extract(first_table(&doc), 1).unwrap();
        assert_eq!(table.title, "Grupo B");
        assert_eq!(table.headers, vec!["Equipo"]);
        assert_eq!(table.rows, vec![vec!["Pizarrales".to_string()]]);
    }

    #[test]
    fn enclosing_block_heading_then_default_label() {
        let doc = Html::parse_document(
            r#"<section class="category"><h2>Medallero</h2>
                 <div class="wrap"><p>a</p><p>b</p><p>c</p><p>d</p>
                   <table><tr><td>Oro</td><td>3</td></tr></table></div>
               </section>"#,
        );
        let table = Table::extract(first_table(&doc), 1).unwrap();
        assert_eq!(table.title, "Medallero");
        assert!(table.headers.is_empty());

        let bare = Html::parse_document("<table><tr><td>x</td></tr></table>");
        assert_eq!(Table::extract(first_table(&bare), 4).unwrap().title, "Tabla 4");
    }

    #[test]
    fn sibling_search_stops_at_previous_table() {
        let doc = Html::parse_document(
            r#"<div><h3>Primera</h3><table><tr><td>1</td></tr></table>
               <table id="second"><tr><td>2</td></tr></table></div>"#,
        );
        let second = dom::select_first(doc.root_element(), &Selectors::new(&["#second"])).unwrap();
        // falls through to the enclosing div's first heading
        assert_eq!(Table::extract(second, 2).unwrap().title, "Primera");

        let isolated = Html::parse_document(
            r#"<h3>Lejos</h3><p>1</p><p>2</p><p>3</p><table><tr><td>x</td></tr></table>"#,
        );
        assert_eq!(Table::extract(first_table(&isolated), 1).unwrap().title, "Tabla 1");
    }

    #[test]
    fn empty_rows_dropped_and_empty_tables_rejected() {
        let doc = Html::parse_document(
            r#"<table><tr><th>A</th></tr><tr><td> </td></tr></table>"#,
        );
        assert!(Table::extract(first_table(&doc), 1).is_none());
    }

    #[test]
    fn nested_table_rows_are_not_claimed_by_outer_table() {
        let doc = Html::parse_document(
            r#"<table><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr></table>"#,
        );
        let table = Table::extract(first_table(&doc), 1).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn headings_after_the_table_are_not_used() {
        let doc = Html::parse_document(
            r#"<div class="category">
                 <table><tr><td>1</td></tr></table>
                 <p>x</p><h3>Medallero</h3>
                 <table id="medals"><tr><td>Oro</td></tr></table>
               </div>"#,
        );
        assert_eq!(Table::extract(first_table(&doc), 1).unwrap().title, "Tabla 1");
        let medals = dom::select_first(doc.root_element(), &Selectors::new(&["#medals"])).unwrap();
        assert_eq!(Table::extract(medals, 2).unwrap().title, "Medallero");
    }

    #[test]
    fn nearest_earlier_block_heading_wins() {
        let doc = Html::parse_document(
            r#"<section><h2>Atletismo</h2><h3>100 metros</h3>
                 <div><p>a</p><p>b</p><p>c</p><table><tr><td>Atocha</td></tr></table></div>
                 <h3>200 metros</h3>
               </section>"#,
        );
        assert_eq!(Table::extract(first_table(&doc), 1).unwrap().title, "100 metros");
    }
}
