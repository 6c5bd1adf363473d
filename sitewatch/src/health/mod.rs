//! ヘルスチェックパイプライン
//!
//! プローブ → 判定 → 記録 を1パスとして実行し、記録済みの観測から
//! 稼働率とステータスバッジを算出する。

/// ステータスバッジ
pub mod badge;

/// 重大度判定
pub mod classifier;

/// パス実行
pub mod coordinator;

/// HTTPプローブ
pub mod prober;

/// 観測・アラートの記録
pub mod recorder;

/// 稼働率集計
pub mod uptime;

pub use badge::StatusBadge;
pub use classifier::{classify, classify_with_threshold};
pub use coordinator::PassCoordinator;
pub use prober::{HttpProber, Prober};
pub use recorder::{RecordReport, Recorder};
pub use uptime::{aggregate, compute_uptime, AggregateResult, UptimeStats};
