//! sitewatch - Website health monitoring and uptime aggregation
//!
//! 登録済みサイトを定期的にプローブし、観測を記録して稼働率を集計する。

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// cronトリガー認証
pub mod auth;

/// CLIインターフェース
pub mod cli;

/// 共通型・エラー
pub mod common;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ヘルスチェックパイプライン
pub mod health;

/// ログ初期化
pub mod logging;

/// ドメイン型
pub mod types;

use config::MonitorConfig;
use health::PassCoordinator;
use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// SQLiteデータベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// ヘルスチェックパスの実行役
    pub coordinator: Arc<PassCoordinator>,
    /// cronトリガー用シークレット（未設定ならトリガーは常に拒否）
    pub cron_secret: Option<String>,
    /// 稼働率集計ウィンドウ（時間）
    pub uptime_window_hours: i64,
}

impl AppState {
    /// プールと設定から本番構成の状態を作成
    pub fn new(
        db_pool: sqlx::SqlitePool,
        http_client: reqwest::Client,
        monitor_config: MonitorConfig,
        cron_secret: Option<String>,
    ) -> Self {
        let coordinator = PassCoordinator::from_pool(db_pool.clone(), http_client, monitor_config);
        Self {
            db_pool,
            coordinator: Arc::new(coordinator),
            cron_secret,
            uptime_window_hours: health::uptime::DEFAULT_UPTIME_WINDOW_HOURS,
        }
    }

    /// 稼働率集計ウィンドウを変更
    pub fn with_uptime_window_hours(mut self, hours: i64) -> Self {
        self.uptime_window_hours = hours.max(1);
        self
    }
}

/// プローブ用の共有HTTPクライアントを作成
///
/// リダイレクトは reqwest の既定（最大10回）で追従する。
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(health::prober::PROBE_USER_AGENT)
        .build()
}
