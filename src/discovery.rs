//! Filter, sort and paginate article summaries.
//!
//! The pipeline always runs tag filter, free-text filter, stable sort, then
//! pagination. Visibility is decided by whoever builds the input list.

use std::{cmp::Ordering, collections::BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ContentSettings, DEFAULT_PAGE_SIZE},
    models::ArticleRecord,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    #[serde(rename = "like")]
    pub like_count: i64,
    pub tags: Vec<String>,
    pub author: String,
    pub icon_url: String,
    pub published_at: DateTime<Utc>,
    pub reading_time_minutes: u32,
}

impl ArticleSummary {
    pub fn new(record: &ArticleRecord, content: &ContentSettings) -> Self {
        ArticleSummary {
            id: record.id,
            title: record.title.clone(),
            excerpt: content.excerpt(&record.body),
            like_count: record.like_count,
            tags: record.tags(),
            author: record.author_name.clone(),
            icon_url: record.icon_url.clone(),
            published_at: record.published_at.unwrap_or(record.created_at),
            reading_time_minutes: content.reading_minutes(&record.body),
        }
    }

    /// `needle` must already be lower-cased.
    fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    PublishedAt,
    Like,
    Title,
    ReadingTime,
}

impl SortField {
    fn compare(self, a: &ArticleSummary, b: &ArticleSummary) -> Ordering {
        match self {
            SortField::PublishedAt => a.published_at.cmp(&b.published_at),
            SortField::Like => a.like_count.cmp(&b.like_count),
            SortField::Title => a.title.cmp(&b.title),
            SortField::ReadingTime => a.reading_time_minutes.cmp(&b.reading_time_minutes),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryQuery {
    pub free_text: Option<String>,
    pub tag_names: BTreeSet<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for DiscoveryQuery {
    fn default() -> Self {
        Self {
            free_text: None,
            tag_names: BTreeSet::new(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub items: Vec<ArticleSummary>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

pub fn discover(articles: Vec<ArticleSummary>, query: &DiscoveryQuery) -> DiscoveryResult {
    let needle = query
        .free_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    let mut matches: Vec<ArticleSummary> = articles
        .into_iter()
        .filter(|article| {
            query.tag_names.is_empty()
                || article.tags.iter().any(|tag| query.tag_names.contains(tag))
        })
        .filter(|article| {
            needle
                .as_deref()
                .map_or(true, |needle| article.matches_text(needle))
        })
        .collect();

    // sort_by is stable, and reversing an Equal ordering keeps it Equal
    matches.sort_by(|a, b| {
        let ordering = query.sort_field.compare(a, b);
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    paginate(matches, query.page_number, query.page_size)
}

fn paginate(matches: Vec<ArticleSummary>, page_number: u32, page_size: u32) -> DiscoveryResult {
    let total_items = matches.len();
    let has_prev = page_number > 1;

    if page_size == 0 {
        return DiscoveryResult {
            items: Vec::new(),
            current_page: page_number,
            total_pages: 0,
            total_items,
            has_next: false,
            has_prev,
        };
    }

    let size = page_size as usize;
    let total_pages = u32::try_from(total_items.div_ceil(size)).unwrap_or(u32::MAX);
    let end = (page_number as usize).saturating_mul(size);
    let items = if page_number == 0 {
        Vec::new()
    } else {
        let start = end - size;
        matches.into_iter().skip(start).take(size).collect()
    };

    DiscoveryResult {
        items,
        current_page: page_number,
        total_pages,
        total_items,
        has_next: page_number >= 1 && end < total_items,
        has_prev,
    }
}
