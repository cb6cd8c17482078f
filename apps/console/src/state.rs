//! # Application State
//!
//! Shared state for console commands: the database handle, the sync
//! service, and the write worker pool. All three are cheap to clone, so
//! the state is passed by reference and commands grab what they need.

use bodega_db::Database;
use bodega_sync::{SyncService, WriteExecutor};

/// Shared application state.
pub struct AppState {
    /// Local database handle.
    db: Database,

    /// Sync service against the remote store.
    sync: SyncService,

    /// Worker pool every local write runs on.
    executor: WriteExecutor,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database, sync: SyncService, executor: WriteExecutor) -> Self {
        AppState { db, sync, executor }
    }

    /// Returns the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the sync service.
    pub fn sync(&self) -> &SyncService {
        &self.sync
    }

    /// Returns the write worker pool.
    pub fn executor(&self) -> &WriteExecutor {
        &self.executor
    }
}
