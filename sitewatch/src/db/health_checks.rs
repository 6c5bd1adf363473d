//! ヘルスチェック観測レコードのデータベース操作
//!
//! 観測は作成後に更新・削除しない。集計は時間窓で絞り込む。

use super::{
    convert_row, convert_rows, format_timestamp, parse_timestamp, parse_uuid, RowConversionError,
};
use crate::types::health::{Observation, Tier};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// 観測レコードを記録
///
/// `observation.id` は無視され、DBで自動採番されたIDを返す。
pub async fn insert_observation(
    pool: &SqlitePool,
    observation: &Observation,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO health_checks (
            site_id, status, response_time_ms, status_code, checked_at
        ) VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(observation.site_id.to_string())
    .bind(observation.tier.as_str())
    .bind(observation.elapsed_ms as i64)
    .bind(observation.status_code as i64)
    .bind(format_timestamp(observation.checked_at))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 指定時刻以降の観測を新しい順に取得
pub async fn list_observations(
    pool: &SqlitePool,
    site_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<Observation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ObservationRow>(
        r#"
        SELECT id, site_id, status, response_time_ms, status_code, checked_at
        FROM health_checks
        WHERE site_id = ? AND checked_at >= ?
        ORDER BY checked_at DESC, id DESC
        "#,
    )
    .bind(site_id.to_string())
    .bind(format_timestamp(since))
    .fetch_all(pool)
    .await?;

    Ok(convert_rows(rows, "health_checks"))
}

/// 最新の観測を取得
pub async fn latest_observation(
    pool: &SqlitePool,
    site_id: Uuid,
) -> Result<Option<Observation>, sqlx::Error> {
    let row = sqlx::query_as::<_, ObservationRow>(
        r#"
        SELECT id, site_id, status, response_time_ms, status_code, checked_at
        FROM health_checks
        WHERE site_id = ?
        ORDER BY checked_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(site_id.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(convert_row(row, "health_checks"))
}

/// サイトの観測件数（全期間）
pub async fn count_observations(pool: &SqlitePool, site_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM health_checks WHERE site_id = ?")
        .bind(site_id.to_string())
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[derive(sqlx::FromRow)]
struct ObservationRow {
    id: i64,
    site_id: String,
    status: String,
    response_time_ms: i64,
    status_code: i64,
    checked_at: String,
}

impl TryFrom<ObservationRow> for Observation {
    type Error = RowConversionError;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        let tier: Tier = row.status.parse()?;
        Ok(Observation {
            id: row.id,
            site_id: parse_uuid(&row.site_id)?,
            tier,
            elapsed_ms: row.response_time_ms.max(0) as u64,
            status_code: row.status_code.clamp(0, u16::MAX as i64) as u16,
            checked_at: parse_timestamp(&row.checked_at)?,
        })
    }
}
