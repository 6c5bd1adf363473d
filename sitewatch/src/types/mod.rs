//! 型定義

/// ヘルスチェック関連の型
pub mod health;

/// 監視対象サイトの型
pub mod site;

pub use health::{AlertEvent, Observation, PassSummary, RawOutcome, SiteCheckResult, Tier};
pub use site::{LifecycleStatus, Site};
