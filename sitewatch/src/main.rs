//! sitewatch Server Entry Point

use anyhow::Context;
use clap::Parser;
use sitewatch::cli::{Cli, Commands};
use sitewatch::config::{
    get_cron_secret, get_database_url, get_uptime_window_hours, MonitorConfig, ServerConfig,
};
use sitewatch::{api, build_http_client, db, logging, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle subcommands
    let result = match cli.command {
        Some(Commands::Check(args)) => run_check(args).await,
        Some(Commands::Sites(args)) => run_with_logging(sitewatch::cli::sites::execute(&args)).await,
        Some(Commands::Serve(args)) => {
            let cfg = ServerConfig::from_args(args.host, args.port);
            run_with_logging(run_server(cfg)).await
        }
        None => {
            // No subcommand - default to serve
            run_with_logging(run_server(ServerConfig::from_env())).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_with_logging<F>(fut: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    // ガードはプロセス終了まで保持する
    let _guard = logging::init().context("failed to initialize logging")?;
    fut.await
}

async fn run_check(args: sitewatch::cli::check::CheckArgs) -> anyhow::Result<()> {
    let guard = logging::init().context("failed to initialize logging")?;
    let summary = sitewatch::cli::check::execute(&args).await?;
    if sitewatch::cli::check::should_fail(&args, &summary) {
        // process::exit はデストラクタを実行しないため、先にログを書き出す
        drop(guard);
        std::process::exit(2);
    }
    Ok(())
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("sitewatch v{}", env!("CARGO_PKG_VERSION"));

    // データベース接続プールを最初に作成（他コンポーネントが依存）
    let database_url = get_database_url();
    let db_pool = db::init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let monitor_config = MonitorConfig::from_env().context("Invalid monitor configuration")?;
    info!(
        probe_timeout_ms = monitor_config.probe_timeout_ms(),
        degraded_threshold_ms = monitor_config.degraded_threshold_ms,
        max_concurrency = monitor_config.max_concurrency,
        pass_deadline_ms = monitor_config.pass_deadline.map(|d| d.as_millis() as u64),
        "Monitor configuration loaded"
    );

    let cron_secret = get_cron_secret();
    if cron_secret.is_none() {
        warn!("SITEWATCH_CRON_SECRET is not set; the cron trigger will reject every request");
    }

    let http_client = build_http_client().context("Failed to build HTTP client")?;
    let state = AppState::new(db_pool, http_client, monitor_config, cron_secret)
        .with_uptime_window_hours(get_uptime_window_hours());

    let app = api::create_app(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("sitewatch server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
