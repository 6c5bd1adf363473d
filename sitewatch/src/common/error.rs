//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 到達不能やタイムアウトは `Tier::Critical` というデータであり、エラーではない。
//! ここに現れるのはパス全体を失敗させる障害と、HTTP層の拒否のみ。

use axum::http::StatusCode;
use thiserror::Error;

/// sitewatch error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Site registry could not be read; the pass is aborted
    #[error("Site registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Trigger authentication failed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for MonitorError {
    fn from(err: sqlx::Error) -> Self {
        MonitorError::Database(err.to_string())
    }
}

impl MonitorError {
    /// Returns a safe error message for external clients.
    ///
    /// Full error details (`to_string()`) are only written to server logs.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::RegistryUnavailable(_) => "Health check failed",
            Self::Database(_) => "Database error",
            Self::Authentication(_) => "Unauthorized",
            Self::Config(_) => "Server misconfigured",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RegistryUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias
pub type MonitorResult<T> = Result<T, MonitorError>;
