//! cronトリガーの認証
//!
//! `Authorization: Bearer <secret>` を共有シークレットと照合する。
//! 比較は SHA-256 ダイジェスト同士で行う。

use crate::common::error::MonitorError;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};

/// ダイジェスト同士を比較する
fn digest_eq(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// リクエストヘッダーをcronシークレットで検証する
///
/// シークレット未設定の場合はすべて拒否する。
pub fn verify_cron_secret(headers: &HeaderMap, secret: Option<&str>) -> Result<(), MonitorError> {
    let Some(secret) = secret else {
        tracing::warn!("Cron trigger rejected: no secret configured");
        return Err(MonitorError::Authentication(
            "cron secret is not configured".to_string(),
        ));
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| MonitorError::Authentication("missing authorization header".to_string()))?;

    let expected = format!("Bearer {}", secret);
    if digest_eq(provided, &expected) {
        Ok(())
    } else {
        Err(MonitorError::Authentication(
            "authorization header mismatch".to_string(),
        ))
    }
}
