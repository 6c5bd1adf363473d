//! ヘルスチェック型定義
//!
//! プローブ結果・重大度ティア・観測レコード・アラートイベント・パス結果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// 観測の重大度ティア
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 正常
    Healthy,
    /// 応答は返るが遅い
    Degraded,
    /// 4xx など、サーバーは応答しているが正常ではない
    Warning,
    /// 到達不能または5xx
    Critical,
}

impl Tier {
    /// Tierを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// 稼働率計算で「稼働中」とみなすか（healthy / degraded）
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// 不正なティア文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTierError(pub String);

impl std::fmt::Display for ParseTierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown tier: {}", self.0)
    }
}

impl std::error::Error for ParseTierError {}

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(Self::Healthy),
            "degraded" => Ok(Self::Degraded),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 1回のプローブの生の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOutcome {
    /// 期限内にHTTPレスポンスを受信した（ステータスコードは問わない）
    Reached {
        /// HTTPステータスコード
        status_code: u16,
        /// 経過時間（ミリ秒）
        elapsed_ms: u64,
    },
    /// タイムアウト・DNS・TLS・接続拒否などで応答が得られなかった
    Unreached {
        /// 失敗までの経過時間（ミリ秒）
        elapsed_ms: u64,
    },
}

impl RawOutcome {
    /// 記録用のステータスコード（未到達は0）
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Reached { status_code, .. } => *status_code,
            Self::Unreached { .. } => 0,
        }
    }

    /// 経過時間（ミリ秒）
    pub fn elapsed_ms(&self) -> u64 {
        match self {
            Self::Reached { elapsed_ms, .. } | Self::Unreached { elapsed_ms } => *elapsed_ms,
        }
    }

    /// レスポンスを受信したか
    pub fn reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

/// 観測レコード（health_checksテーブル）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    /// 自動インクリメントID
    pub id: i64,
    /// サイトID
    pub site_id: Uuid,
    /// 重大度ティア
    pub tier: Tier,
    /// 経過時間（ミリ秒）
    pub elapsed_ms: u64,
    /// HTTPステータスコード（未到達は0）
    pub status_code: u16,
    /// チェック実行時刻
    pub checked_at: DateTime<Utc>,
}

/// アラートイベントの重大度
pub const ALERT_SEVERITY_CRITICAL: &str = "critical";

/// アラートイベントの種別
pub const ALERT_EVENT_TYPE: &str = "alert";

/// アラートイベント（system_eventsテーブル）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertEvent {
    /// 自動インクリメントID
    pub id: i64,
    /// サイトID
    pub site_id: Option<Uuid>,
    /// イベント種別
    pub event_type: String,
    /// 重大度
    pub severity: String,
    /// 説明文
    pub description: String,
    /// 付加情報（status_code, response_time_ms）
    pub metadata: serde_json::Value,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

/// パス内の1サイト分の結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteCheckResult {
    /// サイトID
    pub site_id: Uuid,
    /// 表示名
    pub site: String,
    /// ドメイン
    pub domain: String,
    /// 判定ティア
    pub status: Tier,
    /// 経過時間（ミリ秒）
    #[serde(rename = "responseTimeMs")]
    pub response_time_ms: u64,
    /// HTTPステータスコード（未到達は0）
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// 観測レコードを永続化できたか
    pub recorded: bool,
}

/// 1回のパスの結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassSummary {
    /// パス完了時刻
    pub timestamp: DateTime<Utc>,
    /// チェック件数
    pub checks: usize,
    /// サイト別結果（レジストリ順）
    pub results: Vec<SiteCheckResult>,
}

impl PassSummary {
    /// 空のパス結果
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            checks: 0,
            results: Vec::new(),
        }
    }

    /// 指定ティアの件数
    pub fn count_tier(&self, tier: Tier) -> usize {
        self.results.iter().filter(|r| r.status == tier).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_string(&Tier::Healthy).unwrap(), "\"healthy\"");
        assert_eq!(serde_json::to_string(&Tier::Degraded).unwrap(), "\"degraded\"");
        assert_eq!(serde_json::to_string(&Tier::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&Tier::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("degraded".parse::<Tier>().unwrap(), Tier::Degraded);
        assert!("up".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_availability() {
        assert!(Tier::Healthy.is_available());
        assert!(Tier::Degraded.is_available());
        assert!(!Tier::Warning.is_available());
        assert!(!Tier::Critical.is_available());
    }

    #[test]
    fn test_unreached_outcome_reports_zero_status() {
        let outcome = RawOutcome::Unreached { elapsed_ms: 10_000 };
        assert_eq!(outcome.status_code(), 0);
        assert_eq!(outcome.elapsed_ms(), 10_000);
        assert!(!outcome.reached());
    }

    #[test]
    fn test_site_check_result_field_names() {
        let result = SiteCheckResult {
            site_id: Uuid::nil(),
            site: "Example".to_string(),
            domain: "example.com".to_string(),
            status: Tier::Healthy,
            response_time_ms: 120,
            status_code: 200,
            recorded: true,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["responseTimeMs"], 120);
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["status"], "healthy");
    }
}
