//! ステータスボードAPI
//!
//! GET /api/health

use crate::api::error::AppError;
use crate::db;
use crate::db::traits::HealthCheckRepository;
use crate::health::badge::StatusBadge;
use crate::types::health::Observation;
use crate::types::site::{LifecycleStatus, Site};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// サイト別の最新状態
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SiteHealth {
    /// サイトID
    pub site_id: Uuid,
    /// 表示名
    pub site_name: String,
    /// ドメイン
    pub domain: String,
    /// ライフサイクル状態
    pub site_status: LifecycleStatus,
    /// 最新観測のティア（観測なしは "unknown"）
    pub health_status: String,
    /// 最新観測の応答時間
    pub response_time_ms: Option<u64>,
    /// 最新観測の時刻
    pub last_check: Option<DateTime<Utc>>,
    /// 表示用バッジ
    pub status_badge: StatusBadge,
}

impl SiteHealth {
    /// サイトと最新観測から作成
    pub fn new(site: &Site, latest: Option<&Observation>) -> Self {
        Self {
            site_id: site.id,
            site_name: site.name.clone(),
            domain: site.domain.clone(),
            site_status: site.status,
            health_status: latest
                .map(|o| o.tier.as_str())
                .unwrap_or("unknown")
                .to_string(),
            response_time_ms: latest.map(|o| o.elapsed_ms),
            last_check: latest.map(|o| o.checked_at),
            status_badge: StatusBadge::from_latest(latest),
        }
    }
}

/// ステータスボードレスポンス
#[derive(Debug, Serialize)]
pub struct HealthBoardResponse {
    /// サイト別の最新状態
    pub data: Vec<SiteHealth>,
}

/// サイトごとの最新状態を組み立てる
///
/// 1サイトの読み取り失敗はログに残し、そのサイトは観測なし（unknown）として扱う。
pub async fn build_board(sites: &[Site], repo: &dyn HealthCheckRepository) -> Vec<SiteHealth> {
    let mut data = Vec::with_capacity(sites.len());
    for site in sites {
        let latest = match repo.latest_observation(site.id).await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::error!(
                    site_id = %site.id,
                    domain = %site.domain,
                    error = %e,
                    "Failed to read latest observation"
                );
                None
            }
        };
        data.push(SiteHealth::new(site, latest.as_ref()));
    }
    data
}

/// GET /api/health - 監視対象サイトの最新状態
pub async fn get_health_board(
    State(state): State<AppState>,
) -> Result<Json<HealthBoardResponse>, AppError> {
    let sites = db::sites::list_active_sites(&state.db_pool).await?;
    let data = build_board(&sites, &state.db_pool).await;

    Ok(Json(HealthBoardResponse { data }))
}
