//! アラートイベントのデータベース操作

use super::{convert_rows, format_timestamp, parse_timestamp, parse_uuid, RowConversionError};
use crate::types::health::AlertEvent;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// アラートイベントを記録
pub async fn insert_alert_event(pool: &SqlitePool, event: &AlertEvent) -> Result<i64, sqlx::Error> {
    let metadata = serde_json::to_string(&event.metadata).unwrap_or_else(|_| "{}".to_string());

    let result = sqlx::query(
        r#"
        INSERT INTO system_events (
            site_id, event_type, severity, description, metadata, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.site_id.map(|id| id.to_string()))
    .bind(&event.event_type)
    .bind(&event.severity)
    .bind(&event.description)
    .bind(&metadata)
    .bind(format_timestamp(event.created_at))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 指定時刻以降のイベントを新しい順に取得
pub async fn list_alert_events(
    pool: &SqlitePool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<AlertEvent>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AlertEventRow>(
        r#"
        SELECT id, site_id, event_type, severity, description, metadata, created_at
        FROM system_events
        WHERE created_at >= ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(format_timestamp(since))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(convert_rows(rows, "system_events"))
}

/// サイトのアラートイベント件数
pub async fn count_site_events(pool: &SqlitePool, site_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_events WHERE site_id = ?")
        .bind(site_id.to_string())
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[derive(sqlx::FromRow)]
struct AlertEventRow {
    id: i64,
    site_id: Option<String>,
    event_type: String,
    severity: String,
    description: String,
    metadata: Option<String>,
    created_at: String,
}

impl TryFrom<AlertEventRow> for AlertEvent {
    type Error = RowConversionError;

    fn try_from(row: AlertEventRow) -> Result<Self, Self::Error> {
        Ok(AlertEvent {
            id: row.id,
            site_id: row.site_id.as_deref().map(parse_uuid).transpose()?,
            event_type: row.event_type,
            severity: row.severity,
            description: row.description,
            metadata: row
                .metadata
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or(serde_json::Value::Null),
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
