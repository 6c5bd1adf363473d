//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::health::ParseTierError;
use crate::types::site::ParseLifecycleStatusError;

/// サイトレジストリ
pub mod sites;

/// ヘルスチェック観測
pub mod health_checks;

/// アラートイベント
pub mod events;

/// Repository traitパターン
pub mod traits;

/// SQLite接続プールを作成する
///
/// ファイルが存在しない場合は親ディレクトリごと作成する。
pub async fn init_db_pool(database_url: &str) -> sqlx::Result<SqlitePool> {
    // SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        // `sqlite::memory:` のような特殊指定はスキップ
        if !path.starts_with(':') {
            let normalized = path.trim_start_matches("//");
            let path_without_params = normalized.split('?').next().unwrap_or(normalized);
            let db_path = std::path::Path::new(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePool::connect_with(connect_options).await
}

/// 埋め込みマイグレーションを実行する
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 時刻をDB保存用の文字列に変換
///
/// ミリ秒固定・`Z` 表記に揃え、文字列比較と時系列順を一致させる。
pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// DB行からドメイン型への変換エラー
#[derive(Debug, thiserror::Error)]
pub enum RowConversionError {
    /// UUIDとして解釈できないID
    #[error("invalid id: {0}")]
    InvalidId(String),
    /// RFC 3339として解釈できない時刻
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// 不正なティア
    #[error(transparent)]
    InvalidTier(#[from] ParseTierError),
    /// 不正なライフサイクル状態
    #[error(transparent)]
    InvalidStatus(#[from] ParseLifecycleStatusError),
}

/// DB保存文字列を時刻に変換
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RowConversionError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RowConversionError::InvalidTimestamp(s.to_string()))
}

/// DB保存文字列をUUIDに変換
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, RowConversionError> {
    Uuid::parse_str(s).map_err(|_| RowConversionError::InvalidId(s.to_string()))
}

/// 行をドメイン型に変換し、変換できない行は警告を出して除外する
pub(crate) fn convert_rows<R, T>(rows: Vec<R>, table: &'static str) -> Vec<T>
where
    T: TryFrom<R, Error = RowConversionError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(table, error = %e, "Skipping malformed row");
                None
            }
        })
        .collect()
}

/// 単一行版の [`convert_rows`]
pub(crate) fn convert_row<R, T>(row: Option<R>, table: &'static str) -> Option<T>
where
    T: TryFrom<R, Error = RowConversionError>,
{
    convert_rows(row.into_iter().collect(), table).pop()
}
