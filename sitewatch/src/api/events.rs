//! イベントフィードAPI
//!
//! GET /api/events

use crate::api::error::AppError;
use crate::db;
use crate::types::health::AlertEvent;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// フィードに含める最大件数
pub const EVENT_FEED_LIMIT: i64 = 50;

/// フィードの対象期間（時間）
pub const EVENT_FEED_WINDOW_HOURS: i64 = 24;

/// 経過時間ラベル付きのイベント
#[derive(Debug, Serialize)]
pub struct EventEntry {
    /// イベント本体
    #[serde(flatten)]
    pub event: AlertEvent,
    /// "5 minutes ago" などの表示用ラベル
    pub time_ago: String,
}

/// イベントフィードレスポンス
#[derive(Debug, Serialize)]
pub struct EventFeedResponse {
    /// 新しい順のイベント
    pub data: Vec<EventEntry>,
}

/// 経過時間を表示用ラベルに変換
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - created_at;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, if minutes > 1 { "s" } else { "" })
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        created_at.format("%b %-d, %-I:%M %p").to_string()
    }
}

/// GET /api/events - 直近のアラートイベント
pub async fn get_events(State(state): State<AppState>) -> Result<Json<EventFeedResponse>, AppError> {
    let now = Utc::now();
    let since = now - Duration::hours(EVENT_FEED_WINDOW_HOURS);
    let events = db::events::list_alert_events(&state.db_pool, since, EVENT_FEED_LIMIT).await?;

    let data = events
        .into_iter()
        .map(|event| EventEntry {
            time_ago: format_time_ago(event.created_at, now),
            event,
        })
        .collect();

    Ok(Json(EventFeedResponse { data }))
}
