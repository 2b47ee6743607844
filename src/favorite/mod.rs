//! Like counter.
//!
//! The server holds one shared, non-negative integer per article. A reader's
//! client remembers locally whether it has liked an article and flips between
//! like and unlike. There is no record of *who* liked what, so clearing the
//! local flag lets the same reader like again.

mod button;
mod flag_store;
mod http;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

pub use button::LikeButton;
pub use flag_store::{flag_key, FileFlagStore, LikeFlagStore, MemoryFlagStore};
pub use http::HttpLikeEndpoint;

#[derive(Debug, thiserror::Error)]
pub enum FavoriteError {
    #[error("could not register your like - please retry")]
    Transport(#[from] reqwest::Error),
    #[error("could not register your like - please retry (status {0})")]
    Status(u16),
    #[error("article {0} not found")]
    NotFound(i64),
    #[error("could not register your like - please retry")]
    Database(#[from] sqlx::Error),
    #[error("could not store the like flag: {0}")]
    Storage(#[from] std::io::Error),
    #[error("like flag file is corrupt: {0}")]
    CorruptFlags(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LikeState {
    #[default]
    NotLiked,
    Liked,
}

impl From<bool> for LikeState {
    fn from(liked: bool) -> Self {
        if liked {
            LikeState::Liked
        } else {
            LikeState::NotLiked
        }
    }
}

impl LikeState {
    pub fn is_liked(self) -> bool {
        self == LikeState::Liked
    }
}

/// Authoritative answer to a like or unlike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub count: i64,
    pub liked: bool,
}

/// Server-side mutation of the shared counter. Each call is one atomic
/// read-modify-write; decrement never goes below zero. Callers must not retry
/// automatically.
#[axum::async_trait]
pub trait LikeEndpoint: Send + Sync {
    async fn increment(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError>;
    async fn decrement(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError>;
}

#[axum::async_trait]
impl<T: LikeEndpoint + ?Sized> LikeEndpoint for Arc<T> {
    async fn increment(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        (**self).increment(article_id).await
    }

    async fn decrement(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        (**self).decrement(article_id).await
    }
}

/// In-process counter, used where no database is around.
#[derive(Debug, Default)]
pub struct MemoryLikeCounter {
    counts: Mutex<HashMap<i64, i64>>,
}

impl MemoryLikeCounter {
    pub fn with_article(self, article_id: i64, count: i64) -> Self {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(article_id, count.max(0));
        self
    }

    pub fn count(&self, article_id: i64) -> Option<i64> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&article_id)
            .copied()
    }

    fn update(&self, article_id: i64, step: impl FnOnce(i64) -> i64) -> Result<i64, FavoriteError> {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let count = counts
            .get_mut(&article_id)
            .ok_or(FavoriteError::NotFound(article_id))?;
        *count = step(*count);
        Ok(*count)
    }
}

#[axum::async_trait]
impl LikeEndpoint for MemoryLikeCounter {
    async fn increment(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        let count = self.update(article_id, |n| n.saturating_add(1))?;
        Ok(LikeOutcome { count, liked: true })
    }

    async fn decrement(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        let count = self.update(article_id, |n| (n - 1).max(0))?;
        Ok(LikeOutcome {
            count,
            liked: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn decrement_is_clamped_at_zero() {
        let counter = MemoryLikeCounter::default().with_article(1, 0);
        let outcome = counter.decrement(1).await.unwrap();
        assert_eq!(outcome, LikeOutcome { count: 0, liked: false });
        counter.decrement(1).await.unwrap();
        assert_eq!(counter.count(1), Some(0));
    }

    #[tokio::test]
    async fn increment_then_decrement_cancels() {
        let counter = MemoryLikeCounter::default().with_article(1, 41);
        assert_eq!(counter.increment(1).await.unwrap().count, 42);
        assert_eq!(counter.decrement(1).await.unwrap().count, 41);
    }

    #[tokio::test]
    async fn unknown_article_is_not_found() {
        let counter = MemoryLikeCounter::default();
        assert_matches!(counter.increment(9).await, Err(FavoriteError::NotFound(9)));
    }

    #[tokio::test]
    async fn concurrent_updates_are_serialized() {
        let counter = Arc::new(MemoryLikeCounter::default().with_article(1, 0));
        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let counter = Arc::clone(&counter);
                tokio::spawn(async move { counter.increment(1).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(counter.count(1), Some(100));

        let tasks: Vec<_> = (0..150)
            .map(|_| {
                let counter = Arc::clone(&counter);
                tokio::spawn(async move { counter.decrement(1).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(counter.count(1), Some(0));
    }
}
