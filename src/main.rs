//! Ziply Server: ephemeral text, link, and file sharing
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use ziply_api::{AppState, build_app, serve, shutdown_signal};
use ziply_core::config::AppConfig;
use ziply_core::error::{AppError, ErrorKind};
use ziply_database::{ShareStore, build_share_store};
use ziply_storage::StorageManager;
use ziply_worker::jobs::{ExpiredShareSweep, OrphanBlobJanitor};
use ziply_worker::{CronScheduler, JobExecutor};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/default.toml`, the `ZIPLY_ENV` overlay,
/// and `ZIPLY__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ZIPLY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Ziply v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    tracing::info!(provider = %config.database.provider, "Initializing share store...");
    let store = build_share_store(&config.database).await?;

    tracing::info!(provider = %config.storage.provider, "Initializing object storage...");
    let storage =
        Arc::new(StorageManager::from_config(&config.storage, &config.server.public_base_url).await?);

    let mut scheduler = if config.worker.enabled {
        Some(start_worker(&config, Arc::clone(&store), &storage).await?)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let state = AppState::new(Arc::clone(&config), store, storage);
    let app = build_app(state, &config.server.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!("Ziply server listening on {}", addr);

    let result = serve(listener, app, shutdown_signal()).await;

    if let Some(scheduler) = scheduler.as_mut() {
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => tracing::info!("Background worker stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Background worker shutdown failed"),
            Err(_) => tracing::warn!("Background worker did not stop within the grace period"),
        }
    }

    result?;
    tracing::info!("Ziply server shut down gracefully");
    Ok(())
}

/// Register the cleanup jobs and start the cron scheduler.
async fn start_worker(
    config: &AppConfig,
    store: Arc<dyn ShareStore>,
    storage: &StorageManager,
) -> Result<CronScheduler, AppError> {
    tracing::info!("Starting background worker...");
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(ExpiredShareSweep::new(
        Arc::clone(&store),
        storage.provider(),
        config.worker.sweep_batch_size,
    )));
    executor.register(Arc::new(OrphanBlobJanitor::new(
        store,
        storage.provider(),
        config.worker.orphan_grace_minutes,
    )));

    let scheduler = CronScheduler::new(Arc::new(executor)).await?;
    scheduler.register_default_tasks(&config.worker).await?;
    scheduler.start().await?;
    tracing::info!(
        sweep = %config.worker.sweep_cron,
        janitor = %config.worker.janitor_cron,
        "Background worker started"
    );
    Ok(scheduler)
}
