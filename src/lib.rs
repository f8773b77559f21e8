pub mod api; // HTTP surface over the schedule service
pub mod config;
pub mod db;
pub mod models;
pub mod schedule; // Dose generation, identity, adherence tracking
pub mod service;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiServer, ServerError};
use crate::config::{ConfigError, ServerConfig};
use crate::db::{Database, DatabaseError, SqliteStore};
use crate::service::ScheduleService;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load configuration, open the database and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    tracing::info!(
        "{} starting v{} (data dir: {})",
        config::APP_NAME,
        config::APP_VERSION,
        config.data_dir.display()
    );

    let db = Database::open(&config.database_path())?;
    let service = Arc::new(ScheduleService::with_sqlite(SqliteStore::new(db)));

    let server = ApiServer::start(config.bind_addr, service).await?;
    tracing::info!(addr = %server.local_addr(), "Listening");
    server.run_until(shutdown_signal()).await?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, shutting down"),
        Err(e) => {
            tracing::error!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
