//! 稼働率の集計
//!
//! 読み取り専用。ウィンドウ内の観測から稼働率と平均応答時間を算出する。

use crate::common::error::MonitorResult;
use crate::db::traits::HealthCheckRepository;
use crate::types::health::{Observation, Tier};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 既定の集計ウィンドウ（時間）
pub const DEFAULT_UPTIME_WINDOW_HOURS: i64 = 24;

/// 集計値
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UptimeStats {
    /// ウィンドウ内の観測数
    pub total_count: usize,
    /// healthy / degraded の観測数
    pub available_count: usize,
    /// 稼働率（%、小数点以下2桁に丸め）
    pub uptime_percentage: f64,
    /// healthy 観測の平均応答時間（ミリ秒、整数に丸め）
    pub average_latency_ms: Option<u64>,
    /// ウィンドウ内で最も新しい観測
    pub most_recent_observation: Observation,
}

/// 集計結果
///
/// 観測ゼロは 0% ではなく「データなし」として区別する。
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    /// ウィンドウ内に観測がない
    NoData,
    /// 集計済み
    Computed(UptimeStats),
}

impl AggregateResult {
    /// 集計値があれば返す
    pub fn stats(&self) -> Option<&UptimeStats> {
        match self {
            Self::NoData => None,
            Self::Computed(stats) => Some(stats),
        }
    }
}

/// 観測列から集計する
pub fn compute_uptime(observations: &[Observation]) -> AggregateResult {
    let Some(most_recent) = observations.iter().max_by_key(|o| o.checked_at) else {
        return AggregateResult::NoData;
    };

    let total_count = observations.len();
    let available_count = observations
        .iter()
        .filter(|o| o.tier.is_available())
        .count();
    let uptime_percentage = round2(available_count as f64 / total_count as f64 * 100.0);

    let healthy: Vec<u64> = observations
        .iter()
        .filter(|o| o.tier == Tier::Healthy)
        .map(|o| o.elapsed_ms)
        .collect();
    let average_latency_ms = if healthy.is_empty() {
        None
    } else {
        let sum: u128 = healthy.iter().map(|&ms| ms as u128).sum();
        Some((sum as f64 / healthy.len() as f64).round() as u64)
    };

    AggregateResult::Computed(UptimeStats {
        total_count,
        available_count,
        uptime_percentage,
        average_latency_ms,
        most_recent_observation: most_recent.clone(),
    })
}

/// 1サイト分をDBから読み出して集計する
pub async fn aggregate(
    repo: &dyn HealthCheckRepository,
    site_id: Uuid,
    window: Duration,
    now: DateTime<Utc>,
) -> MonitorResult<AggregateResult> {
    let observations = repo.list_observations(site_id, now - window).await?;
    Ok(compute_uptime(&observations))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
