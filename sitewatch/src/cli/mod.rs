//! CLI module for sitewatch
//!
//! Provides the command-line interface for running the monitor and managing
//! the site registry.

/// One-shot health check pass
pub mod check;
/// HTTP server
pub mod serve;
/// Site registry management
pub mod sites;

use clap::{Parser, Subcommand};

/// sitewatch - Website health monitoring and uptime aggregation
#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SITEWATCH_HOST                  Bind address (default: 0.0.0.0)
    SITEWATCH_PORT                  Listen port (default: 8080)
    SITEWATCH_LOG_LEVEL             Log level (default: info)
    SITEWATCH_LOG_DIR               Directory for daily rotated log files
    SITEWATCH_DATABASE_URL          Database URL
    SITEWATCH_CRON_SECRET           Shared secret for the cron trigger (required)
    SITEWATCH_PROBE_TIMEOUT_MS      Probe timeout (default: 10000)
    SITEWATCH_DEGRADED_THRESHOLD_MS Degraded latency threshold (default: 3000)
    SITEWATCH_MAX_CONCURRENCY       Probes in flight per pass (default: 16)
    SITEWATCH_PASS_DEADLINE_MS      Overall pass deadline, 0 = none (default: 0)
    SITEWATCH_PROBE_SCHEME          URL scheme for probes (default: https)
    SITEWATCH_UPTIME_WINDOW_HOURS   Uptime window (default: 24)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Run one health check pass and print the summary
    Check(check::CheckArgs),
    /// Manage the site registry
    Sites(sites::SitesArgs),
}
