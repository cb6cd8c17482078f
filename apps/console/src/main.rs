//! # Bodega Console
//!
//! Entry point: loads configuration, opens the local database, wires the
//! sync service, and hands control to the interactive prompt.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bodega_db::{Database, DbConfig};
use bodega_sync::{RemoteStore, SyncConfig, SyncService, WriteExecutor};

mod commands;
mod error;
mod repl;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = SyncConfig::load_or_default(None);

    let db_path = resolve_db_path(&config);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!(path = %db_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    let store = RemoteStore::new(&config.remote.url)
        .with_timeout(Duration::from_secs(config.remote.connect_timeout_secs));
    let executor = WriteExecutor::new(config.workers.write_workers);
    let sync = SyncService::new(
        db.clone(),
        store,
        executor.clone(),
        config.collections.clone(),
    );

    let state = AppState::new(db, sync, executor);
    repl::run(state).await?;
    Ok(())
}

/// Relative database paths land in the per-user data directory, absolute
/// paths are used as given.
fn resolve_db_path(config: &SyncConfig) -> PathBuf {
    let path = PathBuf::from(&config.database.path);
    if path.is_absolute() {
        return path;
    }
    match SyncConfig::default_data_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}
