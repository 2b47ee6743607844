use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the article listing query: the article plus its author, icon
/// and comma-joined tag names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub like_count: i64,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_name: String,
    pub icon_id: i64,
    pub icon_name: String,
    pub icon_url: String,
    pub tag_list: Option<String>,
}

impl ArticleRecord {
    /// Readers only see published articles whose publication time has passed.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.published && self.published_at.is_some_and(|at| at <= now)
    }

    pub fn tags(&self) -> Vec<String> {
        self.tag_list
            .as_deref()
            .map(|list| {
                list.split(',')
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Icon {
    pub id: i64,
    pub name: String,
    pub url: String,
}
