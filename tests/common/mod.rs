#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use techblog::{get_random_free_port, make_router, run_app, Settings};

/// A running server backed by its own sqlite file. The database and its
/// journal files live in `data_dir`, which is removed on drop.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    data_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let (port, address) = get_random_free_port().expect("free port");
    let data_dir = TempDir::new().expect("temp dir");
    let db_path = data_dir.path().join(format!("techblog-{port}.db"));
    let mut settings = Settings::new(format!("sqlite://{}", db_path.display()), address);
    settings.page_size = 9;

    tokio::spawn(run_app(make_router(), settings));

    let app = TestApp {
        base_url: format!("http://{address}"),
        client: reqwest::Client::new(),
        data_dir,
    };
    for _ in 0..100 {
        if let Ok(response) = app.client.get(app.url("/check_health")).send().await {
            if response.status().is_success() {
                return app;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not come up on {address}");
}

impl TestApp {
    /// Scratch directory for files a test wants cleaned up with the app.
    pub fn data_dir(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn put_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed");
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// Creates an author and an icon and returns their ids.
    pub async fn seed_author_and_icon(&self) -> (i64, i64) {
        let user: Value = self
            .post_json(
                "/api/users",
                json!({ "username": "tech_writer", "name": "Tech Writer", "email": "tech@example.com" }),
            )
            .await
            .json()
            .await
            .unwrap();
        let icon: Value = self
            .post_json(
                "/api/icons",
                json!({ "name": "article", "url": "/icons/article.svg" }),
            )
            .await
            .json()
            .await
            .unwrap();
        (
            user["user"]["id"].as_i64().unwrap(),
            icon["icon"]["id"].as_i64().unwrap(),
        )
    }

    pub async fn create_tag(&self, name: &str) -> i64 {
        let tag: Value = self
            .post_json("/api/tags", json!({ "name": name }))
            .await
            .json()
            .await
            .unwrap();
        tag["tag"]["id"].as_i64().unwrap()
    }

    pub async fn create_article(
        &self,
        (author_id, icon_id): (i64, i64),
        title: &str,
        body: &str,
        tag_ids: &[i64],
        published_at: Option<DateTime<Utc>>,
    ) -> i64 {
        let response = self
            .post_json(
                "/api/articles",
                json!({ "article": {
                    "title": title,
                    "body": body,
                    "authorId": author_id,
                    "iconId": icon_id,
                    "tagIds": tag_ids,
                    "published": published_at.is_some(),
                    "publishedAt": published_at,
                }}),
            )
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let article: Value = response.json().await.unwrap();
        article["article"]["id"].as_i64().unwrap()
    }
}
