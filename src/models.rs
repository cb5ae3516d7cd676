//! Persisted page results, the run aggregate and the run summary.
//!
//! Field names are camelCase on disk. Empty buckets are omitted when
//! serializing and default to empty when reading back.

use crate::extract::{Record, Table};
use crate::utils::slugify;
use serde::{Deserialize, Serialize};

/// Everything extracted from the site's landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainPage {
    pub url: String,
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub announcements: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standings: Vec<Record>,
}

/// Everything extracted from one sport discipline page.
///
/// When the page could not be fetched only `name`, `url` and `error` are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportPage {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standings: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medals: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<Record>,
}

impl SportPage {
    /// Placeholder recorded when a sport page could not be fetched or parsed.
    pub fn failed(name: &str, url: &str, error: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// File stem for this sport: the last path segment of its URL, or the
    /// slugified name when the URL has none.
    pub fn slug(&self) -> String {
        let from_url = url::Url::parse(&self.url).ok().and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))
        });
        from_url.unwrap_or_else(|| slugify(&self.name))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Contents of `all_data.json`: the input of the report renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub scraped_at: String,
    pub base_url: String,
    /// `null` when the landing page could not be scraped.
    pub main_page: Option<MainPage>,
    #[serde(default)]
    pub sports: Vec<SportPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportSummary {
    pub name: String,
    pub slug: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results_count: usize,
    pub matches_count: usize,
    pub standings_count: usize,
    pub medals_count: usize,
    pub news_count: usize,
    pub gallery_count: usize,
    pub has_results: bool,
    pub has_matches: bool,
    pub has_standings: bool,
    pub has_medals: bool,
}

impl From<&SportPage> for SportSummary {
    fn from(page: &SportPage) -> Self {
        Self {
            name: page.name.clone(),
            slug: page.slug(),
            url: page.url.clone(),
            error: page.error.clone(),
            results_count: page.results.len(),
            matches_count: page.matches.len(),
            standings_count: page.standings.len(),
            medals_count: page.medals.len(),
            news_count: page.news.len(),
            gallery_count: page.gallery.len(),
            has_results: !page.results.is_empty(),
            has_matches: !page.matches.is_empty(),
            has_standings: !page.standings.is_empty(),
            has_medals: !page.medals.is_empty(),
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub scraped_at: String,
    pub total_sports: usize,
    pub successful: usize,
    pub failed: usize,
    pub main_page_scraped: bool,
    pub sports: Vec<SportSummary>,
}

impl From<&Aggregate> for RunSummary {
    fn from(aggregate: &Aggregate) -> Self {
        let sports: Vec<SportSummary> = aggregate.sports.iter().map(SportSummary::from).collect();
        let failed = sports.iter().filter(|s| s.error.is_some()).count();
        Self {
            scraped_at: aggregate.scraped_at.clone(),
            total_sports: sports.len(),
            successful: sports.len() - failed,
            failed,
            main_page_scraped: aggregate.main_page.is_some(),
            sports,
        }
    }
}
