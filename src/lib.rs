mod data_formats;
mod db_helpers;
mod errors;
mod handlers;

pub mod config;
pub mod discovery;
pub mod excerpt;
pub mod favorite;
pub mod markdown;
pub mod models;
pub mod slug;
pub mod toc;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::Settings;
pub use data_formats::*;
pub use errors::{RequestError, RequestErrorJson, RequestErrorJsonWrapper};
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
use tower_http::trace::TraceLayer;
use tracing::info;

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, settings: Settings) -> Result<()> {
    let db = init_db(&settings.database_url).await?;
    let address = settings.address;
    let app = app
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(settings)))
        .layer(TraceLayer::new_for_http());
    info!("Server started on {}", address);
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    } else {
        info!("Database already exists");
    }
    let pool = SqlitePool::connect(db_url).await?;
    info!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> Result<(u16, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0").context("Could not bind a free port")?;
    let addr = listener.local_addr().context("Could not get a free port")?;
    Ok((addr.port(), addr))
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/articles", get(list_articles).post(create_article))
        .route(
            "/api/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route("/api/articles/:id/toggle-publish", patch(toggle_publish))
        .route(
            "/api/articles/:id/like",
            get(get_likes).post(like_article).delete(unlike_article),
        )
        .route("/api/tags", get(list_tags).post(create_tag))
        .route(
            "/api/tags/:id",
            get(get_tag).put(update_tag).delete(delete_tag),
        )
        .route("/api/icons", get(list_icons).post(create_icon))
        .route(
            "/api/icons/:id",
            get(get_icon).put(update_icon).delete(delete_icon),
        )
        .route("/api/users", get(list_users).post(create_user))
        .fallback(not_found)
}
