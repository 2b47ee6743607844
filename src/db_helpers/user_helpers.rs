use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::CreateUserRequest;
use crate::errors::RequestError;
use crate::models::User;

use super::reject_duplicate;

pub async fn get_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let result = sqlx::query_as::<Sqlite, User>(
        r#"
        SELECT id, username, name, email, created_at FROM users ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn create_user_in_db(
    pool: &SqlitePool,
    CreateUserRequest {
        username,
        name,
        email,
    }: CreateUserRequest,
) -> Result<User, RequestError> {
    if username.trim().is_empty() || email.trim().is_empty() {
        return Err(RequestError::BadRequest(
            "username and email are required".to_string(),
        ));
    }
    let result = sqlx::query_as::<Sqlite, User>(
        r#"
        INSERT INTO users (username, name, email, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, name, email, created_at
        "#,
    )
    .bind(username.trim())
    .bind(name.trim())
    .bind(email.trim())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| reject_duplicate(e.into(), "Username or email already exists"))?;
    Ok(result)
}
