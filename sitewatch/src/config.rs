//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and the explicit
//! configuration objects handed to the monitoring pipeline at construction.

use crate::common::error::{MonitorError, MonitorResult};
use crate::health::classifier::DEGRADED_LATENCY_THRESHOLD_MS;
use crate::health::prober::DEFAULT_PROBE_TIMEOUT_MS;
use std::time::Duration;

/// 同時に実行するプローブ数の既定値
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use sitewatch::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("SITEWATCH_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Monitoring pipeline configuration
///
/// Passed into the pass coordinator at construction; nothing in the pipeline
/// reads the environment at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Maximum wait for a single probe, measured from issuance.
    pub probe_timeout: Duration,
    /// Responses slower than this (strictly greater) are classified degraded.
    pub degraded_threshold_ms: u64,
    /// Maximum number of probes in flight within one pass.
    pub max_concurrency: usize,
    /// Optional overall deadline for a pass. Probes still outstanding when it
    /// passes are cancelled and recorded as critical / unreached.
    pub pass_deadline: Option<Duration>,
    /// URL scheme used to reach a site's domain.
    pub probe_scheme: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            degraded_threshold_ms: DEGRADED_LATENCY_THRESHOLD_MS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            pass_deadline: None,
            probe_scheme: "https".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load monitoring configuration from environment variables.
    ///
    /// Returns `MonitorError::Config` when the loaded values fail [`validate`](Self::validate).
    pub fn from_env() -> MonitorResult<Self> {
        let timeout_ms = get_env_with_fallback_parse(
            "SITEWATCH_PROBE_TIMEOUT_MS",
            "PROBE_TIMEOUT_MS",
            DEFAULT_PROBE_TIMEOUT_MS,
        );
        let degraded_threshold_ms = get_env_with_fallback_parse(
            "SITEWATCH_DEGRADED_THRESHOLD_MS",
            "DEGRADED_THRESHOLD_MS",
            DEGRADED_LATENCY_THRESHOLD_MS,
        );
        let max_concurrency = get_env_with_fallback_parse(
            "SITEWATCH_MAX_CONCURRENCY",
            "HEALTH_CHECK_CONCURRENCY",
            DEFAULT_MAX_CONCURRENCY,
        );
        // 0 は「期限なし」
        let pass_deadline_ms: u64 =
            get_env_with_fallback_parse("SITEWATCH_PASS_DEADLINE_MS", "PASS_DEADLINE_MS", 0);
        let probe_scheme =
            get_env_with_fallback_or("SITEWATCH_PROBE_SCHEME", "PROBE_SCHEME", "https");

        let config = Self {
            probe_timeout: Duration::from_millis(timeout_ms.max(1)),
            degraded_threshold_ms,
            max_concurrency: max_concurrency.max(1),
            pass_deadline: (pass_deadline_ms > 0).then(|| Duration::from_millis(pass_deadline_ms)),
            probe_scheme,
        };
        config.validate()?;
        Ok(config)
    }

    /// プローブURLのスキームは http / https のみ
    pub fn validate(&self) -> MonitorResult<()> {
        match self.probe_scheme.as_str() {
            "http" | "https" => Ok(()),
            other => Err(MonitorError::Config(format!(
                "unsupported URL scheme: {other} (expected http or https)"
            ))),
        }
    }

    /// Probe timeout in whole milliseconds.
    pub fn probe_timeout_ms(&self) -> u64 {
        self.probe_timeout.as_millis() as u64
    }
}

/// HTTPサーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl ServerConfig {
    /// 環境変数から読み込む（`SITEWATCH_HOST` / `SITEWATCH_PORT`）
    pub fn from_env() -> Self {
        let host = get_env_with_fallback_or("SITEWATCH_HOST", "HOST", "0.0.0.0");
        let port = get_env_with_fallback_parse("SITEWATCH_PORT", "PORT", DEFAULT_PORT);
        Self { host, port }
    }

    /// CLI引数から作成
    pub fn from_args(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 待ち受けポートの既定値
pub const DEFAULT_PORT: u16 = 8080;

/// 稼働率集計ウィンドウ（時間）を取得
pub fn get_uptime_window_hours() -> i64 {
    get_env_with_fallback_parse(
        "SITEWATCH_UPTIME_WINDOW_HOURS",
        "UPTIME_WINDOW_HOURS",
        crate::health::uptime::DEFAULT_UPTIME_WINDOW_HOURS,
    )
    .max(1)
}

/// cronトリガー用の共有シークレットを取得
///
/// 環境変数 `SITEWATCH_CRON_SECRET`（旧: `CRON_SECRET`）から取得する。
/// 未設定または空文字の場合は `None` を返し、トリガーはすべて拒否される。
pub fn get_cron_secret() -> Option<String> {
    get_env_with_fallback("SITEWATCH_CRON_SECRET", "CRON_SECRET").filter(|s| !s.trim().is_empty())
}

/// データベースURLを取得
///
/// 環境変数 `SITEWATCH_DATABASE_URL`（旧: `DATABASE_URL`）から取得し、
/// 未設定の場合は `~/.sitewatch/sitewatch.db` を使用する。
pub fn get_database_url() -> String {
    get_env_with_fallback("SITEWATCH_DATABASE_URL", "DATABASE_URL").unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        format!("sqlite:{}/.sitewatch/sitewatch.db", home)
    })
}
