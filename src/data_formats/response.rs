use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    discovery::{ArticleSummary, DiscoveryResult},
    models::{ArticleRecord, Icon, Tag, User},
    toc::TableOfContentsEntry,
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleSummary>,
    pub pagination: Pagination,
}

/// Everything an article page needs: listing fields, the raw body, its
/// rendered form and the sidebar entries.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub article: ArticleSummary,
    pub content: String,
    pub html: String,
    pub summary: String,
    pub table_of_contents: Vec<TocEntryResponse>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TocEntryResponse {
    pub id: String,
    pub title: String,
    pub level: u8,
}

/// Author-facing view of an article, published or not.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecordResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub like: i64,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub author: String,
    pub icon: IconResponse,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IconResponse {
    pub id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub success: bool,
    pub total_likes: i64,
    pub is_liked: bool,
    #[serde(default)]
    pub message: String,
}

impl From<DiscoveryResult> for ArticlesResponse {
    fn from(
        DiscoveryResult {
            items,
            current_page,
            total_pages,
            total_items,
            has_next,
            has_prev,
        }: DiscoveryResult,
    ) -> Self {
        ArticlesResponse {
            articles: items,
            pagination: Pagination {
                current_page,
                total_pages,
                total_items,
                has_next,
                has_prev,
            },
        }
    }
}

impl From<TableOfContentsEntry> for TocEntryResponse {
    fn from(
        TableOfContentsEntry {
            anchor_id,
            title,
            nesting_level,
        }: TableOfContentsEntry,
    ) -> Self {
        TocEntryResponse {
            id: anchor_id,
            title,
            level: nesting_level,
        }
    }
}

impl ArticleRecordResponse {
    pub fn new(record: ArticleRecord) -> Self {
        let tags = record.tags();
        let ArticleRecord {
            id,
            title,
            body,
            like_count,
            published,
            published_at,
            created_at,
            author_name,
            icon_id,
            icon_name,
            icon_url,
            ..
        } = record;
        ArticleRecordResponse {
            id,
            title,
            body,
            like: like_count,
            published,
            published_at,
            created_at,
            tags,
            author: author_name,
            icon: IconResponse {
                id: icon_id,
                name: icon_name,
                url: icon_url,
            },
        }
    }
}

impl From<Tag> for TagResponse {
    fn from(Tag { id, name }: Tag) -> Self {
        TagResponse { id, name }
    }
}

impl From<Icon> for IconResponse {
    fn from(Icon { id, name, url }: Icon) -> Self {
        IconResponse { id, name, url }
    }
}

impl From<User> for UserResponse {
    fn from(
        User {
            id,
            username,
            name,
            email,
            created_at,
        }: User,
    ) -> Self {
        UserResponse {
            id,
            username,
            name,
            email,
            created_at,
        }
    }
}

impl LikeResponse {
    pub fn new(total_likes: i64, is_liked: bool) -> Self {
        let message = if is_liked {
            "Liked the article"
        } else {
            "Removed your like"
        };
        LikeResponse {
            success: true,
            total_likes,
            is_liked,
            message: message.to_string(),
        }
    }
}
