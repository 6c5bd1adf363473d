//! 監視対象サイト型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// サイトのライフサイクル状態
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// 本番稼働中
    Production,
    /// 開発中
    #[default]
    Development,
    /// ステージング
    Staging,
    /// 監視対象外
    Inactive,
}

impl LifecycleStatus {
    /// 監視対象となる状態の一覧
    pub const MONITORED: [LifecycleStatus; 3] = [
        LifecycleStatus::Production,
        LifecycleStatus::Development,
        LifecycleStatus::Staging,
    ];

    /// LifecycleStatusを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Inactive => "inactive",
        }
    }

    /// ヘルスチェックの対象かどうか
    pub fn is_monitored(&self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// 不正なライフサイクル文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLifecycleStatusError(pub String);

impl std::fmt::Display for ParseLifecycleStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown lifecycle status: {}", self.0)
    }
}

impl std::error::Error for ParseLifecycleStatusError {}

impl FromStr for LifecycleStatus {
    type Err = ParseLifecycleStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "inactive" => Ok(Self::Inactive),
            other => Err(ParseLifecycleStatusError(other.to_string())),
        }
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 監視対象サイト
///
/// レジストリが所有し、1回のパスの間は不変の入力として扱う。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    /// サイトID
    pub id: Uuid,
    /// ドメイン名（スキームなし、例: `example.com`）
    pub domain: String,
    /// 表示名
    pub name: String,
    /// ライフサイクル状態
    pub status: LifecycleStatus,
    /// 登録日時
    pub registered_at: DateTime<Utc>,
}

impl Site {
    /// 新しいサイトを作成
    pub fn new(name: impl Into<String>, domain: impl Into<String>, status: LifecycleStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: domain.into(),
            name: name.into(),
            status,
            registered_at: Utc::now(),
        }
    }
}
