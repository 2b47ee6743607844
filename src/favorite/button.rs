use tracing::warn;

use super::{FavoriteError, LikeEndpoint, LikeFlagStore, LikeState};

/// Reader-side like toggle for one article.
///
/// The state shown before any click comes from the local flag store alone.
/// After a round trip the server's count and liked flag replace whatever the
/// button held; a failed round trip changes nothing.
pub struct LikeButton<E, S> {
    article_id: i64,
    state: LikeState,
    count: i64,
    endpoint: E,
    store: S,
}

impl<E: LikeEndpoint, S: LikeFlagStore> LikeButton<E, S> {
    pub fn new(article_id: i64, initial_count: i64, endpoint: E, store: S) -> Self {
        let state = store
            .load(article_id)
            .map(LikeState::from)
            .unwrap_or_default();
        Self {
            article_id,
            state,
            count: initial_count,
            endpoint,
            store,
        }
    }

    pub fn state(&self) -> LikeState {
        self.state
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Likes or unlikes depending on the current state and returns the
    /// authoritative count.
    pub async fn toggle(&mut self) -> Result<i64, FavoriteError> {
        let result = match self.state {
            LikeState::NotLiked => self.endpoint.increment(self.article_id).await,
            LikeState::Liked => self.endpoint.decrement(self.article_id).await,
        };
        let outcome = result.map_err(|e| {
            warn!(article_id = self.article_id, error = %e, "like round trip failed");
            e
        })?;

        self.count = outcome.count;
        self.state = LikeState::from(outcome.liked);
        if let Err(e) = self.store.save(self.article_id, outcome.liked) {
            warn!(article_id = self.article_id, error = %e, "could not persist like flag");
        }
        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::favorite::{FileFlagStore, LikeOutcome, MemoryFlagStore, MemoryLikeCounter};

    struct Unreachable;

    #[axum::async_trait]
    impl LikeEndpoint for Unreachable {
        async fn increment(&self, _: i64) -> Result<LikeOutcome, FavoriteError> {
            Err(FavoriteError::Status(503))
        }

        async fn decrement(&self, _: i64) -> Result<LikeOutcome, FavoriteError> {
            Err(FavoriteError::Status(503))
        }
    }

    #[tokio::test]
    async fn toggles_between_liked_and_not_liked() {
        let counter = Arc::new(MemoryLikeCounter::default().with_article(1, 10));
        let mut button = LikeButton::new(1, 10, Arc::clone(&counter), MemoryFlagStore::default());
        assert_eq!(button.state(), LikeState::NotLiked);

        assert_eq!(button.toggle().await.unwrap(), 11);
        assert_eq!(button.state(), LikeState::Liked);
        assert_eq!(button.store().load(1), Some(true));

        assert_eq!(button.toggle().await.unwrap(), 10);
        assert_eq!(button.state(), LikeState::NotLiked);
        assert_eq!(button.store().load(1), Some(false));
        assert_eq!(counter.count(1), Some(10));
    }

    #[tokio::test]
    async fn adopts_the_server_count() {
        let counter = Arc::new(MemoryLikeCounter::default().with_article(1, 50));
        // page was rendered with a stale count
        let mut button = LikeButton::new(1, 3, Arc::clone(&counter), MemoryFlagStore::default());
        assert_eq!(button.toggle().await.unwrap(), 51);
        assert_eq!(button.count(), 51);
    }

    #[tokio::test]
    async fn failure_leaves_state_untouched() {
        let mut store = MemoryFlagStore::default();
        store.save(1, true).unwrap();
        let mut button = LikeButton::new(1, 7, Unreachable, store);

        assert_matches!(button.toggle().await, Err(FavoriteError::Status(503)));
        assert_eq!(button.state(), LikeState::Liked);
        assert_eq!(button.count(), 7);
        assert_eq!(button.store().load(1), Some(true));
        assert_eq!(
            FavoriteError::Status(503).to_string(),
            "could not register your like - please retry (status 503)"
        );
    }

    #[tokio::test]
    async fn state_survives_a_reload_without_a_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("flags.json");
        let counter = Arc::new(MemoryLikeCounter::default().with_article(4, 0));

        let mut button = LikeButton::new(4, 0, Arc::clone(&counter), FileFlagStore::open(&path).unwrap());
        button.toggle().await.unwrap();
        drop(button);

        // the endpoint would fail, so the state can only come from disk
        let reloaded = LikeButton::new(4, 1, Unreachable, FileFlagStore::open(&path).unwrap());
        assert_eq!(reloaded.state(), LikeState::Liked);
    }

    #[tokio::test]
    async fn clearing_local_flags_allows_liking_again() {
        // Likes are not tracked per identity: a reader who wipes local storage
        // counts twice. This is accepted behaviour.
        let counter = Arc::new(MemoryLikeCounter::default().with_article(2, 0));
        let mut button = LikeButton::new(2, 0, Arc::clone(&counter), MemoryFlagStore::default());
        button.toggle().await.unwrap();

        let mut store = button.into_store();
        store.clear();
        let mut again = LikeButton::new(2, 1, Arc::clone(&counter), store);
        assert_eq!(again.state(), LikeState::NotLiked);
        assert_eq!(again.toggle().await.unwrap(), 2);
    }
}
