//! check subcommand
//!
//! Runs a single health check pass against the configured database and prints
//! the summary as JSON. Intended to be invoked from an external scheduler.

use crate::config::{get_database_url, MonitorConfig};
use crate::health::PassCoordinator;
use crate::types::health::{PassSummary, Tier};
use crate::{build_http_client, db};
use clap::Args;

/// Arguments for the check subcommand
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Exit with a non-zero status when any site is critical
    #[arg(long, default_value_t = false)]
    pub fail_on_critical: bool,

    /// Print compact JSON instead of pretty-printed output
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

/// Execute the check command
///
/// Returns the summary so the caller can decide on the exit status.
pub async fn execute(args: &CheckArgs) -> Result<PassSummary, anyhow::Error> {
    let pool = db::init_db_pool(&get_database_url()).await?;
    db::run_migrations(&pool).await?;

    let coordinator =
        PassCoordinator::from_pool(pool, build_http_client()?, MonitorConfig::from_env()?);
    let summary = coordinator.run_pass().await?;

    // 標準出力にはJSONのみを書く（ログは標準エラー出力）
    println!("{}", render_summary(&summary, args.compact)?);

    Ok(summary)
}

/// Render the pass summary as the JSON document printed on stdout
pub fn render_summary(summary: &PassSummary, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(summary)
    } else {
        serde_json::to_string_pretty(summary)
    }
}

/// Whether the summary should make the process exit with failure
pub fn should_fail(args: &CheckArgs, summary: &PassSummary) -> bool {
    args.fail_on_critical && summary.count_tier(Tier::Critical) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::health::SiteCheckResult;
    use chrono::Utc;
    use uuid::Uuid;

    fn summary_with(status: Tier) -> PassSummary {
        PassSummary {
            timestamp: Utc::now(),
            checks: 1,
            results: vec![SiteCheckResult {
                site_id: Uuid::new_v4(),
                site: "Example".to_string(),
                domain: "example.com".to_string(),
                status,
                response_time_ms: 10,
                status_code: 200,
                recorded: true,
            }],
        }
    }

    #[test]
    fn test_should_fail_only_when_requested() {
        let lenient = CheckArgs {
            fail_on_critical: false,
            compact: false,
        };
        let strict = CheckArgs {
            fail_on_critical: true,
            compact: false,
        };

        assert!(!should_fail(&lenient, &summary_with(Tier::Critical)));
        assert!(should_fail(&strict, &summary_with(Tier::Critical)));
        assert!(!should_fail(&strict, &summary_with(Tier::Warning)));
    }

    #[test]
    fn test_render_summary_is_a_single_json_document() {
        let summary = summary_with(Tier::Critical);
        for compact in [true, false] {
            let output = render_summary(&summary, compact).unwrap();
            assert!(output.starts_with('{'));
            let value: serde_json::Value = serde_json::from_str(&output).unwrap();
            assert_eq!(value["checks"], 1);
            assert_eq!(value["results"][0]["status"], "critical");
        }
        assert!(!render_summary(&summary, true).unwrap().contains('\n'));
    }
}
