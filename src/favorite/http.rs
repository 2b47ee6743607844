use reqwest::{Client, Method, StatusCode};

use super::{FavoriteError, LikeEndpoint, LikeOutcome};
use crate::data_formats::LikeResponse;

/// Talks to `/api/articles/:id/like` of a running server.
#[derive(Debug, Clone)]
pub struct HttpLikeEndpoint {
    client: Client,
    base_url: String,
}

impl HttpLikeEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, method: Method, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        let url = format!("{}/api/articles/{article_id}/like", self.base_url);
        let response = self.client.request(method, url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(FavoriteError::NotFound(article_id)),
            status if !status.is_success() => Err(FavoriteError::Status(status.as_u16())),
            _ => {
                let body: LikeResponse = response.json().await?;
                Ok(LikeOutcome {
                    count: body.total_likes,
                    liked: body.is_liked,
                })
            }
        }
    }
}

#[axum::async_trait]
impl LikeEndpoint for HttpLikeEndpoint {
    async fn increment(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        self.send(Method::POST, article_id).await
    }

    async fn decrement(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        self.send(Method::DELETE, article_id).await
    }
}
