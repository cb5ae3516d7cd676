//! Page scrapers for the event site.
//!
//! Each scraper declares its buckets as selector tables and hands them to
//! [`crate::extract`]. Parsing is pure: fetching, pacing and persistence live
//! in [`crate::scrape`].
//!
//! | Page | Module | Buckets |
//! |------|--------|---------|
//! | Landing page | [`main_page`] | announcements, news, schedule, navigation, standings |
//! | Sport discipline | [`sport`] | results, matches, standings, medals, news, gallery |

pub mod main_page;
pub mod sport;

use crate::extract::{Collection, Field};
use once_cell::sync::Lazy;

/// News items; shared by the landing page and the sport pages.
pub(crate) static NEWS: Lazy<Collection> = Lazy::new(|| {
    Collection::new(&[], &[".news-item", ".noticia", "article", ".post", ".entry"])
        .field(Field::text(
            "title",
            &["h2 a", "h3 a", "h2", "h3", "h4", ".title", ".titulo", ".entry-title"],
        ))
        .field(Field::text("date", &["time", ".date", ".fecha", ".entry-date", ".published"]))
        .field(Field::text(
            "summary",
            &[".excerpt", ".resumen", ".summary", ".entry-summary", "p"],
        ))
        .field(Field::url(
            "link",
            &["h2 a[href]", "h3 a[href]", "a.read-more[href]", "a[href]"],
            "href",
        ))
        .field(Field::image("image", &["img"]))
        .identity(&["title"])
});

pub use main_page::parse_main_page;
pub use sport::parse_sport_page;
