//! Question Log Daemon - Main Entry Point

mod config;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use qlog_api_rpc::RpcServer;
use qlog_core::application::LogService;
use qlog_core::port::id_provider::UuidProvider;
use qlog_core::port::time_provider::SystemTimeProvider;
use qlog_infra_sqlite::{create_pool, run_migrations, SqliteQuestionLogRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("qlog=info"))
        .expect("Failed to create env filter");

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

async fn build_service(config: &DaemonConfig) -> Result<LogService> {
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    if !config.logging_enabled {
        warn!("QLOG_LOGGING_ENABLED is false, serving with logging disabled");
        return Ok(LogService::disabled(id_provider, time_provider));
    }

    if let Some(parent) = Path::new(&config.db_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    info!(db_path = %config.db_path, "Initializing database...");
    let pool = create_pool(&config.db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    let repo = Arc::new(SqliteQuestionLogRepository::new(pool));
    Ok(LogService::new(repo, id_provider, time_provider))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DaemonConfig::from_env().context("Invalid configuration")?;

    init_tracing(config.log_format);
    info!("Question log daemon v{} starting...", VERSION);

    let service = Arc::new(build_service(&config).await?);

    let rpc_server = RpcServer::new(config.rpc.clone(), service);
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "Ready. Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");
    Ok(())
}
