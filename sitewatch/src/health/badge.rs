//! ステータスボード用のバッジ

use crate::types::health::{Observation, Tier};
use serde::Serialize;

/// 表示用のサイト状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    /// 正常
    Healthy,
    /// 遅延または4xx
    Warning,
    /// 停止
    Critical,
    /// 観測なし
    Unknown,
}

impl StatusBadge {
    /// ティアからバッジへ
    pub fn from_tier(tier: Tier) -> Self {
        match tier {
            Tier::Healthy => Self::Healthy,
            Tier::Degraded | Tier::Warning => Self::Warning,
            Tier::Critical => Self::Critical,
        }
    }

    /// 最新の観測からバッジを決める
    pub fn from_latest(latest: Option<&Observation>) -> Self {
        latest.map_or(Self::Unknown, |o| Self::from_tier(o.tier))
    }

    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}
