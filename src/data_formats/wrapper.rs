use serde::{Deserialize, Serialize};

use super::response::{IconResponse, TagResponse, UserResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper<T> {
    pub article: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TagWrapper {
    pub tag: TagResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TagsWrapper {
    pub tags: Vec<TagResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IconWrapper {
    pub icon: IconResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IconsWrapper {
    pub icons: Vec<IconResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper {
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UsersWrapper {
    pub users: Vec<UserResponse>,
}

impl<T> ArticleWrapper<T> {
    pub fn wrap(article: T) -> Self {
        ArticleWrapper { article }
    }
}
