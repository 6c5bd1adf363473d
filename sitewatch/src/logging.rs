//! ログ初期化
//!
//! 標準エラー出力への fmt レイヤーに加え、`SITEWATCH_LOG_DIR` が設定されていれば
//! 日次ローテーションのファイル出力を追加する。標準出力は `check` の JSON 出力専用。

use crate::config::get_env_with_fallback_or;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{
        self,
        format::{DefaultFields, Format},
    },
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// ログファイル名のプレフィックス
pub const LOG_FILE_PREFIX: &str = "sitewatch.log";

/// ログレベル指定を取得（`SITEWATCH_LOG_LEVEL`、旧: `RUST_LOG`、既定: info）
pub fn log_filter_directive() -> String {
    get_env_with_fallback_or("SITEWATCH_LOG_LEVEL", "RUST_LOG", "info")
}

/// コンソール用 fmt レイヤー（標準エラー出力）
pub(crate) fn console_layer<S>() -> fmt::Layer<S, DefaultFields, Format, fn() -> std::io::Stderr> {
    fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr as fn() -> std::io::Stderr)
}

/// tracing subscriber を初期化する
///
/// ファイル出力を有効にした場合は `WorkerGuard` を返す。プロセス終了まで
/// 保持しないとバッファが書き出されない。
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_filter_directive())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match std::env::var("SITEWATCH_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer())
                .try_init()?;
            Ok(None)
        }
    }
}
