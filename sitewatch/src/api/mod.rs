//! REST APIハンドラー
//!
//! cronトリガー、稼働率、ステータスボード、イベントフィード

/// cronトリガー
pub mod cron;
/// エラーレスポンス
pub mod error;
/// イベントフィード
pub mod events;
/// ステータスボード
pub mod health;
/// 稼働率
pub mod uptime;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/cron/health-check", get(cron::run_health_check))
        .route("/api/uptime", get(uptime::get_uptime))
        .route("/api/health", get(health::get_health_board))
        .route("/api/events", get(events::get_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
