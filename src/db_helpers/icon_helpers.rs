use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{CreateIconRequest, UpdateIconRequest};
use crate::errors::RequestError;
use crate::models::Icon;

use super::reject_in_use;

pub async fn get_icons_in_db(pool: &SqlitePool) -> Result<Vec<Icon>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Icon>("SELECT id, name, url FROM icons ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_icon_in_db(pool: &SqlitePool, id: i64) -> Result<Icon, RequestError> {
    sqlx::query_as::<Sqlite, Icon>("SELECT id, name, url FROM icons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(RequestError::NotFound("Icon not found"))
}

pub async fn create_icon_in_db(
    pool: &SqlitePool,
    CreateIconRequest { name, url }: CreateIconRequest,
) -> Result<Icon, RequestError> {
    if name.trim().is_empty() || url.trim().is_empty() {
        return Err(RequestError::BadRequest(
            "name and url are required".to_string(),
        ));
    }
    let result = sqlx::query_as::<Sqlite, Icon>(
        r#"
        INSERT INTO icons (name, url)
        VALUES ($1, $2)
        RETURNING id, name, url
        "#,
    )
    .bind(name.trim())
    .bind(url.trim())
    .fetch_one(pool)
    .await?;
    Ok(result)
}

/// Updates whichever of `name` and `url` is given. At least one must be.
pub async fn update_icon_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateIconRequest { name, url }: UpdateIconRequest,
) -> Result<Icon, RequestError> {
    let name = name.as_deref().map(str::trim);
    let url = url.as_deref().map(str::trim);
    if name.is_none() && url.is_none() {
        return Err(RequestError::BadRequest(
            "name or url is required".to_string(),
        ));
    }
    if name.is_some_and(str::is_empty) || url.is_some_and(str::is_empty) {
        return Err(RequestError::BadRequest(
            "name and url cannot be blank".to_string(),
        ));
    }

    sqlx::query_as::<Sqlite, Icon>(
        r#"
        UPDATE icons
        SET name = COALESCE($2, name),
            url  = COALESCE($3, url)
        WHERE id = $1
        RETURNING id, name, url
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(url)
    .fetch_optional(pool)
    .await?
    .ok_or(RequestError::NotFound("Icon not found"))
}

/// Icons still shown on an article cannot be removed.
pub async fn delete_icon_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM icons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| reject_in_use(e.into(), "Icon is still used by an article"))?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Icon not found"));
    }
    Ok(())
}
