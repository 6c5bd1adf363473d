//! Repository traitパターン定義
//!
//! DB操作を抽象化し、パイプラインをストレージから切り離すためのtrait群。
//! 各traitは既存のフリー関数に対応し、`SqlitePool` が本番実装となる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::types::health::{AlertEvent, Observation};
use crate::types::site::Site;

// ---------------------------------------------------------------------------
// SiteRepository
// ---------------------------------------------------------------------------

/// サイトレジストリ読み取りのRepository trait
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// 監視対象サイト（production / development / staging）を取得
    async fn list_active_sites(&self) -> Result<Vec<Site>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// HealthCheckRepository
// ---------------------------------------------------------------------------

/// 観測レコード操作のRepository trait
#[async_trait]
pub trait HealthCheckRepository: Send + Sync {
    /// 観測を記録
    async fn insert_observation(&self, observation: &Observation) -> Result<i64, sqlx::Error>;
    /// 指定時刻以降の観測を新しい順に取得
    async fn list_observations(
        &self,
        site_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Observation>, sqlx::Error>;
    /// 最新の観測を取得
    async fn latest_observation(&self, site_id: Uuid) -> Result<Option<Observation>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// AlertEventRepository
// ---------------------------------------------------------------------------

/// アラートイベント操作のRepository trait
#[async_trait]
pub trait AlertEventRepository: Send + Sync {
    /// アラートイベントを記録
    async fn insert_alert_event(&self, event: &AlertEvent) -> Result<i64, sqlx::Error>;
    /// 指定時刻以降のイベントを新しい順に取得
    async fn list_alert_events(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<AlertEvent>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// SqlitePool implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl SiteRepository for SqlitePool {
    async fn list_active_sites(&self) -> Result<Vec<Site>, sqlx::Error> {
        super::sites::list_active_sites(self).await
    }
}

#[async_trait]
impl HealthCheckRepository for SqlitePool {
    async fn insert_observation(&self, observation: &Observation) -> Result<i64, sqlx::Error> {
        super::health_checks::insert_observation(self, observation).await
    }

    async fn list_observations(
        &self,
        site_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Observation>, sqlx::Error> {
        super::health_checks::list_observations(self, site_id, since).await
    }

    async fn latest_observation(&self, site_id: Uuid) -> Result<Option<Observation>, sqlx::Error> {
        super::health_checks::latest_observation(self, site_id).await
    }
}

#[async_trait]
impl AlertEventRepository for SqlitePool {
    async fn insert_alert_event(&self, event: &AlertEvent) -> Result<i64, sqlx::Error> {
        super::events::insert_alert_event(self, event).await
    }

    async fn list_alert_events(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<AlertEvent>, sqlx::Error> {
        super::events::list_alert_events(self, since, limit).await
    }
}
