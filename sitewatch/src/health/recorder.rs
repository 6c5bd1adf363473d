//! 観測結果の記録
//!
//! 観測1件を書き込み、critical の場合のみアラートイベントを1件追加する。
//! 2つの書き込みは独立しており、失敗はログに残すだけでパスを止めない。

use crate::db::traits::{AlertEventRepository, HealthCheckRepository};
use crate::types::health::{
    AlertEvent, Observation, RawOutcome, Tier, ALERT_EVENT_TYPE, ALERT_SEVERITY_CRITICAL,
};
use crate::types::site::Site;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// 記録結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordReport {
    /// 観測レコードのID（書き込み失敗時は `None`）
    pub observation_id: Option<i64>,
    /// アラートを書き込もうとしたか（critical のときのみ）
    pub alert_attempted: bool,
    /// アラートイベントのID（未作成・失敗時は `None`）
    pub alert_id: Option<i64>,
}

impl RecordReport {
    /// 観測レコードが保存されたか
    pub fn observation_saved(&self) -> bool {
        self.observation_id.is_some()
    }
}

/// 観測・アラートの記録担当
#[derive(Clone)]
pub struct Recorder {
    checks: Arc<dyn HealthCheckRepository>,
    alerts: Arc<dyn AlertEventRepository>,
}

impl Recorder {
    /// 新しいRecorderを作成
    pub fn new(
        checks: Arc<dyn HealthCheckRepository>,
        alerts: Arc<dyn AlertEventRepository>,
    ) -> Self {
        Self { checks, alerts }
    }

    /// 1サイト分の結果を記録
    pub async fn record(
        &self,
        site: &Site,
        tier: Tier,
        outcome: &RawOutcome,
        checked_at: DateTime<Utc>,
    ) -> RecordReport {
        let observation = Observation {
            id: 0, // DBで自動採番
            site_id: site.id,
            tier,
            elapsed_ms: outcome.elapsed_ms(),
            status_code: outcome.status_code(),
            checked_at,
        };

        let observation_id = match self.checks.insert_observation(&observation).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(
                    site_id = %site.id,
                    domain = %site.domain,
                    error = %e,
                    "Failed to insert health check"
                );
                None
            }
        };

        if tier != Tier::Critical {
            return RecordReport {
                observation_id,
                alert_attempted: false,
                alert_id: None,
            };
        }

        let event = alert_event_for(site, outcome, checked_at);
        let alert_id = match self.alerts.insert_alert_event(&event).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(
                    site_id = %site.id,
                    domain = %site.domain,
                    error = %e,
                    "Failed to insert alert event"
                );
                None
            }
        };

        RecordReport {
            observation_id,
            alert_attempted: true,
            alert_id,
        }
    }
}

/// critical 観測に対するアラートイベントを組み立てる
pub fn alert_event_for(site: &Site, outcome: &RawOutcome, created_at: DateTime<Utc>) -> AlertEvent {
    AlertEvent {
        id: 0,
        site_id: Some(site.id),
        event_type: ALERT_EVENT_TYPE.to_string(),
        severity: ALERT_SEVERITY_CRITICAL.to_string(),
        description: format!("{} is DOWN ({})", site.name, site.domain),
        metadata: json!({
            "status_code": outcome.status_code(),
            "response_time_ms": outcome.elapsed_ms(),
        }),
        created_at,
    }
}
