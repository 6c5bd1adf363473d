//! HTTP API integration tests
//!
//! cronトリガー・稼働率・ステータスボード・イベントフィードを
//! `tower::ServiceExt::oneshot` 経由で検証する。

mod support;

use axum::http::StatusCode;
use serde_json::json;
use sitewatch::db;
use sitewatch::types::site::{LifecycleStatus, Site};
use support::{bearer, create_test_app, get_json, register_mock_site, TEST_CRON_SECRET};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn failing_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn cron_without_secret_is_unauthorized_and_writes_nothing() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let site = register_mock_site(&pool, "Guarded", &server).await;

    let (status, body) = get_json(&app, "/api/cron/health-check", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));

    let (status, _) = get_json(&app, "/api/cron/health-check", Some("Bearer wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let count = db::health_checks::count_observations(&pool, site.id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn cron_rejects_everything_when_no_secret_configured() {
    let (app, _pool) = create_test_app(None).await;

    let (status, body) = get_json(&app, "/api/cron/health-check", Some("Bearer ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn cron_with_empty_registry_reports_zero_checks() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let retired = Site::new("Retired", "retired.example", LifecycleStatus::Inactive);
    db::sites::create_site(&pool, &retired).await.unwrap();

    let (status, body) = get_json(&app, "/api/cron/health-check", Some(&bearer())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "No active sites to check", "checks": 0})
    );
}

#[tokio::test]
async fn cron_runs_pass_and_records_results() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let up = healthy_server().await;
    let down = failing_server().await;
    let up_site = register_mock_site(&pool, "Up", &up).await;
    let down_site = register_mock_site(&pool, "Down", &down).await;

    let (status, body) = get_json(&app, "/api/cron/health-check", Some(&bearer())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health checks completed");
    assert_eq!(body["checks"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    let up_result = results
        .iter()
        .find(|r| r["site"] == "Up")
        .expect("result for Up");
    assert_eq!(up_result["status"], "healthy");
    assert_eq!(up_result["statusCode"], 200);
    let down_result = results
        .iter()
        .find(|r| r["site"] == "Down")
        .expect("result for Down");
    assert_eq!(down_result["status"], "critical");
    assert_eq!(down_result["statusCode"], 503);

    assert_eq!(
        db::health_checks::count_observations(&pool, up_site.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        db::events::count_site_events(&pool, up_site.id).await.unwrap(),
        0
    );
    assert_eq!(
        db::events::count_site_events(&pool, down_site.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn uptime_reports_null_for_site_without_data() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let site = Site::new("Quiet", "quiet.example", LifecycleStatus::Development);
    db::sites::create_site(&pool, &site).await.unwrap();

    let (status, body) = get_json(&app, "/api/uptime", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["period"], "last_24_hours");

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["site_name"], "Quiet");
    assert!(data[0]["uptime_percentage"].is_null());
    assert_eq!(data[0]["total_checks"], 0);
}

#[tokio::test]
async fn uptime_after_pass_reflects_observations() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let up = healthy_server().await;
    register_mock_site(&pool, "Up", &up).await;

    let (status, _) = get_json(&app, "/api/cron/health-check", Some(&bearer())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/api/cron/health-check", Some(&bearer())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/api/uptime", None).await;
    let entry = &body["data"][0];
    assert_eq!(entry["uptime_percentage"], 100.0);
    assert_eq!(entry["total_checks"], 2);
    assert_eq!(entry["healthy_checks"], 2);
    assert!(entry["avg_response_time"].is_u64());
    assert!(entry["last_check"].is_string());
}

#[tokio::test]
async fn health_board_shows_badges() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let down = failing_server().await;
    register_mock_site(&pool, "Down", &down).await;
    let fresh = Site::new("Fresh", "fresh.invalid", LifecycleStatus::Staging);
    db::sites::create_site(&pool, &fresh).await.unwrap();

    let (status, body) = get_json(&app, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|d| d["status_badge"] == "unknown"));

    get_json(&app, "/api/cron/health-check", Some(&bearer())).await;

    let (_, body) = get_json(&app, "/api/health", None).await;
    let down_entry = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["site_name"] == "Down")
        .cloned()
        .unwrap();
    assert_eq!(down_entry["status_badge"], "critical");
    assert_eq!(down_entry["health_status"], "critical");
    assert_eq!(down_entry["site_status"], "production");
}

#[tokio::test]
async fn events_feed_lists_recent_alerts() {
    let (app, pool) = create_test_app(Some(TEST_CRON_SECRET)).await;
    let down = failing_server().await;
    let site = register_mock_site(&pool, "Down", &down).await;

    let (_, body) = get_json(&app, "/api/events", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    get_json(&app, "/api/cron/health-check", Some(&bearer())).await;

    let (status, body) = get_json(&app, "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "alert");
    assert_eq!(events[0]["severity"], "critical");
    assert_eq!(
        events[0]["description"],
        format!("Down is DOWN ({})", site.domain)
    );
    assert_eq!(events[0]["metadata"]["status_code"], 503);
    assert_eq!(events[0]["time_ago"], "Just now");
}
