//! プローブ結果の重大度判定
//!
//! 純粋関数。同じ入力には常に同じティアを返す。

use crate::types::health::{RawOutcome, Tier};

/// この値を超える（`>`）応答時間は degraded とする（ミリ秒）
pub const DEGRADED_LATENCY_THRESHOLD_MS: u64 = 3_000;

/// このステータス以上はサーバーエラーとして critical とする
pub const SERVER_ERROR_STATUS_FLOOR: u16 = 500;

/// 成功・リダイレクトとみなすステータスの範囲
pub const SUCCESS_STATUS_RANGE: std::ops::RangeInclusive<u16> = 200..=399;

/// 既定の閾値でティアを判定
pub fn classify(outcome: &RawOutcome) -> Tier {
    classify_with_threshold(outcome, DEGRADED_LATENCY_THRESHOLD_MS)
}

/// degraded 閾値を指定してティアを判定
///
/// 判定順:
/// 1. 未到達 → critical
/// 2. 5xx → critical
/// 3. 2xx/3xx かつ閾値超過 → degraded
/// 4. 2xx/3xx → healthy
/// 5. それ以外（1xx, 4xx） → warning
pub fn classify_with_threshold(outcome: &RawOutcome, degraded_threshold_ms: u64) -> Tier {
    match *outcome {
        RawOutcome::Unreached { .. } => Tier::Critical,
        RawOutcome::Reached { status_code, .. } if status_code >= SERVER_ERROR_STATUS_FLOOR => {
            Tier::Critical
        }
        RawOutcome::Reached {
            status_code,
            elapsed_ms,
        } if SUCCESS_STATUS_RANGE.contains(&status_code) => {
            if elapsed_ms > degraded_threshold_ms {
                Tier::Degraded
            } else {
                Tier::Healthy
            }
        }
        RawOutcome::Reached { .. } => Tier::Warning,
    }
}
