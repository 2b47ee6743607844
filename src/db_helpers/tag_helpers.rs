use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Tag;

use super::reject_duplicate;

pub async fn get_tags_in_db(pool: &SqlitePool) -> Result<Vec<Tag>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Tag>(
        r#"
        SELECT id, name FROM tags ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn get_tag_in_db(pool: &SqlitePool, id: i64) -> Result<Tag, RequestError> {
    sqlx::query_as::<Sqlite, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(RequestError::NotFound("Tag not found"))
}

pub async fn create_tag_in_db(pool: &SqlitePool, name: &str) -> Result<Tag, RequestError> {
    let name = checked_tag_name(name)?;
    let result = sqlx::query_as::<Sqlite, Tag>(
        r#"
        INSERT INTO tags (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| reject_duplicate(e.into(), "Tag name already exists"))?;
    Ok(result)
}

pub async fn update_tag_in_db(pool: &SqlitePool, id: i64, name: &str) -> Result<Tag, RequestError> {
    let name = checked_tag_name(name)?;
    sqlx::query_as::<Sqlite, Tag>(
        r#"
        UPDATE tags
        SET name = $2
        WHERE id = $1
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| reject_duplicate(e.into(), "Tag name already exists"))?
    .ok_or(RequestError::NotFound("Tag not found"))
}

/// Removing a tag detaches it from every article that carried it.
pub async fn delete_tag_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Tag not found"));
    }
    Ok(())
}

/// Tag names are stored trimmed. Commas are refused because article rows carry
/// their tags as one comma-joined column.
fn checked_tag_name(name: &str) -> Result<&str, RequestError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::BadRequest("name is required".to_string()));
    }
    if name.contains(',') {
        return Err(RequestError::BadRequest(
            "tag names cannot contain commas".to_string(),
        ));
    }
    Ok(name)
}
