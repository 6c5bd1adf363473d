//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::MonitorError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub MonitorError);

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        AppError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError(MonitorError::from(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // 詳細はログにのみ残し、クライアントには external_message() を返す
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let payload = json!({
            "error": self.0.external_message()
        });

        (status, Json(payload)).into_response()
    }
}
