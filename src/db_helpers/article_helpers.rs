use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data_formats::{CreateArticleRequest, UpdateArticleRequest};
use crate::errors::RequestError;
use crate::models::ArticleRecord;

use super::reject_unknown_reference;

const ARTICLE_QUERY: &str = r#"
            SELECT articles.id                                    AS "id",
                   articles.title                                 AS "title",
                   articles.body                                  AS "body",
                   articles.like_count                            AS "like_count",
                   articles.published                             AS "published",
                   articles.published_at                          AS "published_at",
                   articles.created_at                            AS "created_at",
                   articles.author_id                             AS "author_id",
                   users.name                                     AS "author_name",
                   articles.icon_id                               AS "icon_id",
                   icons.name                                     AS "icon_name",
                   icons.url                                      AS "icon_url",
                   (SELECT Group_concat(tags.name, ',')
                    FROM   tags
                           JOIN article_tags
                             ON article_tags.tag_id = tags.id
                    WHERE  article_tags.article_id = articles.id) AS "tag_list"
            FROM   articles
                   JOIN users
                     ON articles.author_id = users.id
                   JOIN icons
                     ON articles.icon_id = icons.id
     "#;

pub async fn list_articles_in_db(pool: &SqlitePool) -> Result<Vec<ArticleRecord>, RequestError> {
    let query = format!("{ARTICLE_QUERY} ORDER BY articles.created_at DESC, articles.id DESC");
    let result = sqlx::query_as::<Sqlite, ArticleRecord>(&query)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_article_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<ArticleRecord>, RequestError> {
    let query = format!("{ARTICLE_QUERY} WHERE articles.id = $1");
    let result = sqlx::query_as::<Sqlite, ArticleRecord>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    CreateArticleRequest {
        title,
        body,
        author_id,
        icon_id,
        tag_ids,
        published,
        published_at,
    }: CreateArticleRequest,
) -> Result<ArticleRecord, RequestError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    // publishing without a date means "now"
    let published_at = match published_at {
        None if published => Some(now),
        other => other,
    };

    let article_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO articles (title, body, published, published_at, created_at, author_id, icon_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(body)
    .bind(published)
    .bind(published_at)
    .bind(now)
    .bind(author_id)
    .bind(icon_id)
    .fetch_one(&mut tx)
    .await
    .map_err(|e| reject_unknown_reference(e.into(), "Unknown author or icon"))?;

    insert_article_tags(&mut tx, article_id, &tag_ids).await?;
    tx.commit().await?;

    get_article_in_db(pool, article_id)
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn update_article_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateArticleRequest {
        title,
        body,
        icon_id,
        tag_ids,
        published,
        published_at,
    }: UpdateArticleRequest,
) -> Result<ArticleRecord, RequestError> {
    let mut tx = pool.begin().await?;
    let (was_published, stored_published_at) =
        sqlx::query_as::<Sqlite, (bool, Option<DateTime<Utc>>)>(
            "SELECT published, published_at FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut tx)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;

    let published = published.unwrap_or(was_published);
    let published_at = match published_at {
        Some(at) => Some(at),
        None if published => stored_published_at.or_else(|| Some(Utc::now())),
        None => stored_published_at,
    };

    sqlx::query(
        r#"
        UPDATE articles
        SET title        = COALESCE($2, title),
            body         = COALESCE($3, body),
            icon_id      = COALESCE($4, icon_id),
            published    = $5,
            published_at = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(body)
    .bind(icon_id)
    .bind(published)
    .bind(published_at)
    .execute(&mut tx)
    .await
    .map_err(|e| reject_unknown_reference(e.into(), "Unknown icon"))?;

    if let Some(tag_ids) = tag_ids {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(id)
            .execute(&mut tx)
            .await?;
        insert_article_tags(&mut tx, id, &tag_ids).await?;
    }
    tx.commit().await?;

    get_article_in_db(pool, id)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}

async fn insert_article_tags(
    tx: &mut Transaction<'_, Sqlite>,
    article_id: i64,
    tag_ids: &[i64],
) -> Result<(), RequestError> {
    for &tag_id in tag_ids {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO article_tags (article_id, tag_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(article_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| reject_unknown_reference(e.into(), "Unknown tag"))?;
    }
    Ok(())
}

pub async fn delete_article_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let result = sqlx::query(
        r#"
        DELETE FROM articles
        WHERE articles.id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }
    Ok(())
}

/// Flips `published`; the first publication stamps `published_at`.
pub async fn toggle_publish_in_db(pool: &SqlitePool, id: i64) -> Result<ArticleRecord, RequestError> {
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET published    = NOT published,
            published_at = CASE
                               WHEN NOT published AND published_at IS NULL THEN $2
                               ELSE published_at
                           END
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }
    get_article_in_db(pool, id)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}
