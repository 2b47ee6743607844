use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    config::Settings,
    data_formats::{
        ArticleDetailResponse, ArticleQueryParams, ArticleRecordResponse, ArticleWrapper,
        ArticlesResponse, CreateArticleRequest, CreateIconRequest, CreateTagRequest,
        CreateUserRequest, IconWrapper, IconsWrapper, LikeResponse, TagWrapper, TagsWrapper,
        UpdateArticleRequest, UpdateIconRequest, UserWrapper, UsersWrapper,
    },
    db_helpers::{
        create_article_in_db, create_icon_in_db, create_tag_in_db, create_user_in_db,
        delete_article_in_db, delete_icon_in_db, delete_tag_in_db, get_article_in_db,
        get_icon_in_db, get_icons_in_db, get_likes_in_db, get_tag_in_db, get_tags_in_db,
        get_users_in_db, list_articles_in_db, toggle_publish_in_db, update_article_in_db,
        update_icon_in_db, update_tag_in_db,
    },
    discovery::{discover, ArticleSummary},
    errors::RequestError,
    favorite::LikeEndpoint,
    markdown::render,
    toc::table_of_contents,
    JsonResponse,
};

type JsonResult<T> = Result<Json<T>, RequestError>;
type CreatedResult<T> = Result<JsonResponse<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Article Handlers -----------------
pub async fn list_articles(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(settings): Extension<Arc<Settings>>,
    Query(params): Query<ArticleQueryParams>,
) -> JsonResult<ArticlesResponse> {
    let now = Utc::now();
    let summaries = list_articles_in_db(&pool)
        .await?
        .iter()
        .filter(|record| record.is_visible(now))
        .map(|record| ArticleSummary::new(record, &settings.content))
        .collect();
    let query = params.into_query(settings.page_size);
    tracing::debug!(?query, "discovering articles");
    Ok(Json(discover(summaries, &query).into()))
}

pub async fn get_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(id): Path<i64>,
) -> JsonResult<ArticleDetailResponse> {
    let record = get_article_in_db(&pool, id)
        .await?
        .filter(|record| record.is_visible(Utc::now()))
        .ok_or(RequestError::NotFound("Article not found"))?;

    let document = render(&record.body);
    let article = ArticleSummary::new(&record, &settings.content);
    let result = ArticleDetailResponse {
        summary: article.excerpt.clone(),
        article,
        html: document.html,
        table_of_contents: table_of_contents(&document.anchors)
            .into_iter()
            .map(Into::into)
            .collect(),
        content: record.body,
    };
    Ok(Json(result))
}

pub async fn create_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<CreateArticleRequest>>,
) -> CreatedResult<ArticleWrapper<ArticleRecordResponse>> {
    if request.title.trim().is_empty() || request.body.trim().is_empty() {
        return Err(RequestError::BadRequest(
            "title and body are required".to_string(),
        ));
    }
    let record = create_article_in_db(&pool, request).await?;
    tracing::info!(article_id = record.id, "article created");
    Ok((
        StatusCode::CREATED,
        Json(ArticleWrapper::wrap(ArticleRecordResponse::new(record))),
    ))
}

pub async fn update_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<UpdateArticleRequest>>,
) -> JsonResult<ArticleWrapper<ArticleRecordResponse>> {
    let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&request.title) || blank(&request.body) {
        return Err(RequestError::BadRequest(
            "title and body cannot be blank".to_string(),
        ));
    }
    let record = update_article_in_db(&pool, id, request).await?;
    tracing::info!(article_id = id, "article updated");
    Ok(Json(ArticleWrapper::wrap(ArticleRecordResponse::new(record))))
}

pub async fn delete_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_article_in_db(&pool, id).await?;
    tracing::info!(article_id = id, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_publish(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<ArticleWrapper<ArticleRecordResponse>> {
    let record = toggle_publish_in_db(&pool, id).await?;
    tracing::info!(article_id = id, published = record.published, "publication toggled");
    Ok(Json(ArticleWrapper::wrap(ArticleRecordResponse::new(record))))
}

// ----------------- Like Handlers -----------------
pub async fn get_likes(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<LikeResponse> {
    let total_likes = get_likes_in_db(&pool, id).await?;
    // liked-ness lives on the client; the server only knows the count
    Ok(Json(LikeResponse {
        success: true,
        total_likes,
        is_liked: false,
        message: String::new(),
    }))
}

pub async fn like_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<LikeResponse> {
    let outcome = pool.increment(id).await?;
    Ok(Json(LikeResponse::new(outcome.count, outcome.liked)))
}

pub async fn unlike_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<LikeResponse> {
    let outcome = pool.decrement(id).await?;
    Ok(Json(LikeResponse::new(outcome.count, outcome.liked)))
}

// ----------------- Reference Data Handlers -----------------
pub async fn list_tags(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<TagsWrapper> {
    let tags = get_tags_in_db(&pool).await?;
    Ok(Json(TagsWrapper {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(CreateTagRequest { name }): Json<CreateTagRequest>,
) -> CreatedResult<TagWrapper> {
    let tag = create_tag_in_db(&pool, &name).await?;
    Ok((StatusCode::CREATED, Json(TagWrapper { tag: tag.into() })))
}

pub async fn get_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<TagWrapper> {
    let tag = get_tag_in_db(&pool, id).await?;
    Ok(Json(TagWrapper { tag: tag.into() }))
}

pub async fn update_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(CreateTagRequest { name }): Json<CreateTagRequest>,
) -> JsonResult<TagWrapper> {
    let tag = update_tag_in_db(&pool, id, &name).await?;
    Ok(Json(TagWrapper { tag: tag.into() }))
}

pub async fn delete_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_tag_in_db(&pool, id).await?;
    tracing::info!(tag_id = id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_icons(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<IconsWrapper> {
    let icons = get_icons_in_db(&pool).await?;
    Ok(Json(IconsWrapper {
        icons: icons.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_icon(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateIconRequest>,
) -> CreatedResult<IconWrapper> {
    let icon = create_icon_in_db(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(IconWrapper { icon: icon.into() })))
}

pub async fn get_icon(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<IconWrapper> {
    let icon = get_icon_in_db(&pool, id).await?;
    Ok(Json(IconWrapper { icon: icon.into() }))
}

pub async fn update_icon(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateIconRequest>,
) -> JsonResult<IconWrapper> {
    let icon = update_icon_in_db(&pool, id, request).await?;
    Ok(Json(IconWrapper { icon: icon.into() }))
}

pub async fn delete_icon(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_icon_in_db(&pool, id).await?;
    tracing::info!(icon_id = id, "icon deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<UsersWrapper> {
    let users = get_users_in_db(&pool).await?;
    Ok(Json(UsersWrapper {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreateUserRequest>,
) -> CreatedResult<UserWrapper> {
    let user = create_user_in_db(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(UserWrapper { user: user.into() })))
}
