pub mod alarms;
pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod store;
pub mod views;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::alarms::{AlarmEvaluator, TracingNotifier};
use crate::config::{ConfigError, ServerConfig};
use crate::core_state::{CoreError, CoreState};
use crate::db::DatabaseError;
use crate::store::CareStore;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot create data directory: {0}")]
    DataDir(#[source] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// built-in filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Run the query service and alarm ticker until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    init_tracing();
    tracing::info!("MedReminder starting v{}", config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    let core = prepare_state(&config)?;

    let ticker = if config.alarms_enabled {
        let evaluator = AlarmEvaluator::new(Box::new(TracingNotifier), config.fire_policy);
        Some(alarms::start_alarm_ticker(core.clone(), evaluator))
    } else {
        tracing::info!("Alarm ticker disabled");
        None
    };

    let server = api::start_api_server(core, config.socket_addr()).await?;

    let signal = tokio::signal::ctrl_c().await.map_err(AppError::Signal);
    tracing::info!("Shutting down");

    server.stop().await;
    if let Some(ticker) = ticker {
        ticker.stop().await;
    }
    signal
}

/// Open (and optionally seed) the database, then build the shared state
/// with the store hydrated from it.
pub fn prepare_state(config: &ServerConfig) -> Result<Arc<CoreState>, AppError> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(AppError::DataDir)?;
    }

    let conn = db::open_database(&config.db_path)?;
    if config.seed_demo_data {
        let demo = CareStore::seeded();
        db::seed_if_empty(&conn, demo.patients(), demo.medications())?;
    }
    drop(conn);

    let core = Arc::new(CoreState::new(config.db_path.clone()));
    core.hydrate_from_db()?;
    Ok(core)
}
