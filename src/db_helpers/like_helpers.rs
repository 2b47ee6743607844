use sqlx::{Sqlite, SqlitePool};

use crate::favorite::{FavoriteError, LikeEndpoint, LikeOutcome};

// Each mutation is a single UPDATE, so concurrent likes on one article are
// serialized by sqlite and the CHECK (like_count >= 0) can never trip.

pub async fn increment_likes_in_db(pool: &SqlitePool, id: i64) -> Result<i64, FavoriteError> {
    sqlx::query_scalar::<Sqlite, i64>(
        r#"
        UPDATE articles
        SET like_count = like_count + 1
        WHERE id = $1
        RETURNING like_count
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(FavoriteError::NotFound(id))
}

pub async fn decrement_likes_in_db(pool: &SqlitePool, id: i64) -> Result<i64, FavoriteError> {
    sqlx::query_scalar::<Sqlite, i64>(
        r#"
        UPDATE articles
        SET like_count = MAX(like_count - 1, 0)
        WHERE id = $1
        RETURNING like_count
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(FavoriteError::NotFound(id))
}

pub async fn get_likes_in_db(pool: &SqlitePool, id: i64) -> Result<i64, FavoriteError> {
    sqlx::query_scalar::<Sqlite, i64>("SELECT like_count FROM articles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(FavoriteError::NotFound(id))
}

#[axum::async_trait]
impl LikeEndpoint for SqlitePool {
    async fn increment(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        let count = increment_likes_in_db(self, article_id).await?;
        Ok(LikeOutcome { count, liked: true })
    }

    async fn decrement(&self, article_id: i64) -> Result<LikeOutcome, FavoriteError> {
        let count = decrement_likes_in_db(self, article_id).await?;
        Ok(LikeOutcome {
            count,
            liked: false,
        })
    }
}
