//! サイト死活プローブ
//!
//! 1回の呼び出しにつき外部リクエストは1回のみ。リトライしない。

use crate::config::MonitorConfig;
use crate::types::health::RawOutcome;
use crate::types::site::Site;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// プローブのタイムアウト既定値（ミリ秒）
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// プローブ時に送信するUser-Agent
pub const PROBE_USER_AGENT: &str = concat!("sitewatch-healthcheck/", env!("CARGO_PKG_VERSION"));

/// 1サイトの死活を確認するプローブ
#[async_trait]
pub trait Prober: Send + Sync {
    /// サイトに1回だけリクエストを送り、生の結果を返す
    ///
    /// 失敗はすべて `RawOutcome::Unreached` として表現され、エラーにはならない。
    async fn probe(&self, site: &Site) -> RawOutcome;
}

/// HTTP(S) GET によるプローブ
#[derive(Clone)]
pub struct HttpProber {
    /// 共有HTTPクライアント
    client: Client,
    /// 発行からの最大待ち時間
    timeout: Duration,
    /// URLスキーム（通常は https）
    scheme: String,
}

impl HttpProber {
    /// 設定からプローブを作成
    pub fn new(client: Client, config: &MonitorConfig) -> Self {
        Self {
            client,
            timeout: config.probe_timeout,
            scheme: config.probe_scheme.clone(),
        }
    }

    /// サイトのプローブ先URL
    pub fn probe_url(&self, site: &Site) -> String {
        let domain = site.domain.trim().trim_end_matches('/');
        if domain.contains("://") {
            domain.to_string()
        } else {
            format!("{}://{}", self.scheme, domain)
        }
    }

    fn elapsed_ms(&self, start: Instant) -> u64 {
        // 計測誤差でタイムアウト値を超えないよう丸める
        start.elapsed().min(self.timeout).as_millis() as u64
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, site: &Site) -> RawOutcome {
        let url = self.probe_url(site);
        let request = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, PROBE_USER_AGENT)
            .timeout(self.timeout);

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, request.send()).await;
        let elapsed_ms = self.elapsed_ms(start);

        match result {
            Ok(Ok(response)) => RawOutcome::Reached {
                status_code: response.status().as_u16(),
                elapsed_ms,
            },
            Ok(Err(e)) => {
                debug!(
                    site_id = %site.id,
                    url = %url,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Probe request failed"
                );
                RawOutcome::Unreached { elapsed_ms }
            }
            Err(_) => {
                debug!(
                    site_id = %site.id,
                    url = %url,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Probe timed out"
                );
                RawOutcome::Unreached { elapsed_ms }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::site::LifecycleStatus;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prober_with_timeout(timeout_ms: u64) -> HttpProber {
        let config = MonitorConfig {
            probe_timeout: Duration::from_millis(timeout_ms),
            probe_scheme: "http".to_string(),
            ..MonitorConfig::default()
        };
        HttpProber::new(Client::new(), &config)
    }

    fn site_for(server: &MockServer) -> Site {
        let domain = server.uri().trim_start_matches("http://").to_string();
        Site::new("Mock", domain, LifecycleStatus::Production)
    }

    #[test]
    fn test_probe_url_uses_scheme_and_domain() {
        let prober = HttpProber::new(Client::new(), &MonitorConfig::default());
        let site = Site::new("Example", "example.com/", LifecycleStatus::Production);
        assert_eq!(prober.probe_url(&site), "https://example.com");

        let explicit = Site::new("Local", "http://localhost:8080", LifecycleStatus::Development);
        assert_eq!(prober.probe_url(&explicit), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_probe_reached_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", PROBE_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = prober_with_timeout(2_000).probe(&site_for(&server)).await;
        match outcome {
            RawOutcome::Reached {
                status_code,
                elapsed_ms,
            } => {
                assert_eq!(status_code, 200);
                assert!(elapsed_ms <= 2_000);
            }
            other => panic!("expected reached outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_probe_reports_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let outcome = prober_with_timeout(2_000).probe(&site_for(&server)).await;
        assert_eq!(outcome.status_code(), 503);
        assert!(outcome.reached());
    }

    #[tokio::test]
    async fn test_probe_timeout_is_unreached_and_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1_500)))
            .mount(&server)
            .await;

        let outcome = prober_with_timeout(200).probe(&site_for(&server)).await;
        assert!(!outcome.reached());
        assert_eq!(outcome.status_code(), 0);
        assert!(outcome.elapsed_ms() <= 200);
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_unreached() {
        // 空きポートを確保してから閉じ、接続拒否を再現する
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let site = Site::new(
            "Closed",
            format!("127.0.0.1:{port}"),
            LifecycleStatus::Production,
        );
        let outcome = prober_with_timeout(2_000).probe(&site).await;
        assert!(!outcome.reached());
        assert!(outcome.elapsed_ms() < 2_000);
    }
}
