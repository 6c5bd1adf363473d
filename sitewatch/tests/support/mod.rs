//! 統合テスト共通ヘルパー

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use sitewatch::config::MonitorConfig;
use sitewatch::types::site::{LifecycleStatus, Site};
use sitewatch::{api, db, AppState};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::MockServer;

/// テストで使うcronシークレット
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

/// マイグレーション済みのインメモリDB
pub async fn test_db_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// wiremock に向けてプローブする設定
pub fn test_monitor_config() -> MonitorConfig {
    MonitorConfig {
        probe_timeout: Duration::from_millis(500),
        probe_scheme: "http".to_string(),
        ..MonitorConfig::default()
    }
}

/// テスト用アプリを作成
pub async fn create_test_app(cron_secret: Option<&str>) -> (Router, SqlitePool) {
    let pool = test_db_pool().await;
    let state = AppState::new(
        pool.clone(),
        reqwest::Client::new(),
        test_monitor_config(),
        cron_secret.map(str::to_string),
    );
    (api::create_app(state), pool)
}

/// モックサーバーを指すサイトを登録
pub async fn register_mock_site(pool: &SqlitePool, name: &str, server: &MockServer) -> Site {
    let domain = server.uri().trim_start_matches("http://").to_string();
    let site = Site::new(name, domain, LifecycleStatus::Production);
    db::sites::create_site(pool, &site)
        .await
        .expect("Failed to register site");
    site
}

/// GETリクエストを送り、ステータスとJSONボディを返す
pub async fn get_json(
    app: &Router,
    uri: &str,
    authorization: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// 正しいAuthorizationヘッダー値
pub fn bearer() -> String {
    format!("Bearer {}", TEST_CRON_SECRET)
}
