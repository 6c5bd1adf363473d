//! cronトリガーAPI
//!
//! GET /api/cron/health-check

use crate::api::error::AppError;
use crate::auth::verify_cron_secret;
use crate::types::health::{PassSummary, SiteCheckResult};
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

/// パス完了レスポンス
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// 固定メッセージ
    pub message: &'static str,
    /// パス完了時刻
    pub timestamp: DateTime<Utc>,
    /// チェック件数
    pub checks: usize,
    /// サイト別結果
    pub results: Vec<SiteCheckResult>,
}

impl From<PassSummary> for HealthCheckResponse {
    fn from(summary: PassSummary) -> Self {
        Self {
            message: "Health checks completed",
            timestamp: summary.timestamp,
            checks: summary.checks,
            results: summary.results,
        }
    }
}

/// GET /api/cron/health-check - パスを1回実行
///
/// シークレットが一致しない場合はプローブを行わずに401を返す。
pub async fn run_health_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    verify_cron_secret(&headers, state.cron_secret.as_deref())?;

    let summary = state.coordinator.run_pass().await?;
    if summary.checks == 0 {
        return Ok(Json(json!({
            "message": "No active sites to check",
            "checks": 0
        }))
        .into_response());
    }

    Ok(Json(HealthCheckResponse::from(summary)).into_response())
}
