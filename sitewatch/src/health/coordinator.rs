//! ヘルスチェックパスの実行
//!
//! 1回のパスでレジストリを読み、監視対象サイトを並行にプローブして記録する。
//! サイト単位の失敗は他のサイトに波及しない。

use crate::common::error::{MonitorError, MonitorResult};
use crate::config::MonitorConfig;
use crate::db::traits::SiteRepository;
use crate::health::classifier::classify_with_threshold;
use crate::health::prober::{HttpProber, Prober};
use crate::health::recorder::Recorder;
use crate::types::health::{PassSummary, RawOutcome, SiteCheckResult, Tier};
use crate::types::site::Site;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// パス実行の調整役
#[derive(Clone)]
pub struct PassCoordinator {
    registry: Arc<dyn SiteRepository>,
    prober: Arc<dyn Prober>,
    recorder: Recorder,
    config: MonitorConfig,
}

impl PassCoordinator {
    /// 依存を指定して作成
    pub fn new(
        registry: Arc<dyn SiteRepository>,
        prober: Arc<dyn Prober>,
        recorder: Recorder,
        config: MonitorConfig,
    ) -> Self {
        Self {
            registry,
            prober,
            recorder,
            config,
        }
    }

    /// SQLiteプールとHTTPクライアントから本番構成で作成
    pub fn from_pool(pool: SqlitePool, client: reqwest::Client, config: MonitorConfig) -> Self {
        let prober = HttpProber::new(client, &config);
        let recorder = Recorder::new(Arc::new(pool.clone()), Arc::new(pool.clone()));
        Self::new(Arc::new(pool), Arc::new(prober), recorder, config)
    }

    /// 現在の設定
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// パスを1回実行する
    ///
    /// レジストリの読み取りに失敗した場合のみエラーを返す。この場合は
    /// 何も書き込まない。結果はレジストリの順序で返す。
    pub async fn run_pass(&self) -> MonitorResult<PassSummary> {
        let sites = self.registry.list_active_sites().await.map_err(|e| {
            error!(error = %e, "Failed to load site registry");
            MonitorError::RegistryUnavailable(e.to_string())
        })?;

        if sites.is_empty() {
            info!("No active sites to check");
            return Ok(PassSummary::empty());
        }

        let deadline = self.config.pass_deadline.map(|d| Instant::now() + d);
        let threshold = self.config.degraded_threshold_ms;
        let concurrency = self.config.max_concurrency.max(1);
        let total = sites.len();

        info!(
            sites = total,
            max_concurrency = concurrency,
            "Starting health check pass"
        );

        // spawn は future が初めてpollされた時点で行われるため、
        // 同時実行数は buffer_unordered の上限に従う
        let mut indexed: Vec<(usize, SiteCheckResult)> = stream::iter(sites.into_iter().enumerate())
            .map(|(index, site)| {
                let prober = Arc::clone(&self.prober);
                let recorder = self.recorder.clone();
                async move {
                    let fallback = site.clone();
                    let handle =
                        tokio::spawn(check_site(prober, recorder, site, threshold, deadline));
                    match handle.await {
                        Ok(result) => (index, result),
                        Err(e) => {
                            error!(
                                site_id = %fallback.id,
                                domain = %fallback.domain,
                                panicked = e.is_panic(),
                                "Site check task failed"
                            );
                            (index, aborted_result(&fallback))
                        }
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        let results: Vec<SiteCheckResult> = indexed.into_iter().map(|(_, r)| r).collect();

        let summary = PassSummary {
            timestamp: Utc::now(),
            checks: results.len(),
            results,
        };

        info!(
            checks = summary.checks,
            healthy = summary.count_tier(Tier::Healthy),
            degraded = summary.count_tier(Tier::Degraded),
            warning = summary.count_tier(Tier::Warning),
            critical = summary.count_tier(Tier::Critical),
            "Health check pass completed"
        );

        Ok(summary)
    }
}

/// 1サイト分のプローブ・判定・記録
async fn check_site(
    prober: Arc<dyn Prober>,
    recorder: Recorder,
    site: Site,
    degraded_threshold_ms: u64,
    deadline: Option<Instant>,
) -> SiteCheckResult {
    let start = Instant::now();
    let outcome = match deadline {
        Some(deadline) if start >= deadline => {
            warn!(
                site_id = %site.id,
                domain = %site.domain,
                "Pass deadline elapsed before site check started"
            );
            RawOutcome::Unreached { elapsed_ms: 0 }
        }
        Some(deadline) => match tokio::time::timeout_at(deadline, prober.probe(&site)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    site_id = %site.id,
                    domain = %site.domain,
                    "Pass deadline elapsed before probe completed"
                );
                RawOutcome::Unreached {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                }
            }
        },
        None => prober.probe(&site).await,
    };

    let tier = classify_with_threshold(&outcome, degraded_threshold_ms);
    let report = recorder.record(&site, tier, &outcome, Utc::now()).await;

    SiteCheckResult {
        site_id: site.id,
        site: site.name,
        domain: site.domain,
        status: tier,
        response_time_ms: outcome.elapsed_ms(),
        status_code: outcome.status_code(),
        recorded: report.observation_saved(),
    }
}

/// タスクが異常終了したサイトの結果
fn aborted_result(site: &Site) -> SiteCheckResult {
    SiteCheckResult {
        site_id: site.id,
        site: site.name.clone(),
        domain: site.domain.clone(),
        status: Tier::Critical,
        response_time_ms: 0,
        status_code: 0,
        recorded: false,
    }
}
