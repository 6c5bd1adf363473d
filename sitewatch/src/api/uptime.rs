//! 稼働率API
//!
//! GET /api/uptime

use crate::api::error::AppError;
use crate::db;
use crate::health::uptime::{aggregate, AggregateResult};
use crate::types::site::Site;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// サイト別の稼働率
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SiteUptime {
    /// サイトID
    pub site_id: Uuid,
    /// 表示名
    pub site_name: String,
    /// ドメイン
    pub domain: String,
    /// 稼働率（データなしは null）
    pub uptime_percentage: Option<f64>,
    /// ウィンドウ内の観測数
    pub total_checks: usize,
    /// healthy / degraded の観測数
    pub healthy_checks: usize,
    /// healthy 観測の平均応答時間（ミリ秒）
    pub avg_response_time: Option<u64>,
    /// 直近ウィンドウの観測数
    pub checks_last_24h: usize,
    /// 最新の観測時刻
    pub last_check: Option<DateTime<Utc>>,
}

impl SiteUptime {
    /// 集計結果とサイト情報から作成
    pub fn new(site: &Site, result: &AggregateResult) -> Self {
        let stats = result.stats();
        Self {
            site_id: site.id,
            site_name: site.name.clone(),
            domain: site.domain.clone(),
            uptime_percentage: stats.map(|s| s.uptime_percentage),
            total_checks: stats.map_or(0, |s| s.total_count),
            healthy_checks: stats.map_or(0, |s| s.available_count),
            avg_response_time: stats.and_then(|s| s.average_latency_ms),
            checks_last_24h: stats.map_or(0, |s| s.total_count),
            last_check: stats.map(|s| s.most_recent_observation.checked_at),
        }
    }
}

/// 稼働率レスポンス
#[derive(Debug, Serialize)]
pub struct UptimeResponse {
    /// 常に true
    pub success: bool,
    /// サイト別の稼働率
    pub data: Vec<SiteUptime>,
    /// 集計期間ラベル
    pub period: String,
}

/// GET /api/uptime - 監視対象サイトの稼働率
///
/// 1サイトの読み取り失敗はログに残してそのサイトを除外する。
pub async fn get_uptime(State(state): State<AppState>) -> Result<Json<UptimeResponse>, AppError> {
    let sites = db::sites::list_active_sites(&state.db_pool).await?;
    let window = Duration::hours(state.uptime_window_hours);
    let now = Utc::now();

    let mut data = Vec::with_capacity(sites.len());
    for site in &sites {
        match aggregate(&state.db_pool, site.id, window, now).await {
            Ok(result) => data.push(SiteUptime::new(site, &result)),
            Err(e) => {
                tracing::error!(
                    site_id = %site.id,
                    domain = %site.domain,
                    error = %e,
                    "Failed to aggregate uptime"
                );
            }
        }
    }

    Ok(Json(UptimeResponse {
        success: true,
        data,
        period: format!("last_{}_hours", state.uptime_window_hours),
    }))
}
