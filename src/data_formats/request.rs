use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub icon_id: i64,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial edit: absent fields keep their stored value. `tagIds`, when given,
/// replaces the whole tag set.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon_id: Option<i64>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

// ----------------- Reference Data Request -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateIconRequest {
    pub name: String,
    pub url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdateIconRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub email: String,
}
