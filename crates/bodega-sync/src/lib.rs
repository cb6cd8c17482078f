//! # bodega-sync: Remote Store Sync for Bodega
//!
//! This crate pulls the remote document store into the local SQLite cache
//! so the rest of the app can work against typed rows.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sync Layer Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   SyncService (Main Orchestrator)                │  │
//! │  │                                                                  │  │
//! │  │  sync_all: categorias → proveedores → productos                  │  │
//! │  │  sync_products: products-only refresh                            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  RemoteStore   │  │    Mapping     │  │  WriteExecutor         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ One-shot WS    │  │ Loose docs to  │  │ Fixed pool of workers  │    │
//! │  │ request/reply  │  │ typed records, │  │ running DB writes off  │    │
//! │  │ per operation  │  │ coerced fields │  │ a bounded queue        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  DocumentHub + MemoryStore                       │   │
//! │  │                                                                 │   │
//! │  │ Axum WebSocket server speaking the same protocol, backed by an  │   │
//! │  │ in-memory collection map. Stands in for the hosted store during │   │
//! │  │ development and in integration tests.                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - WebSocket client for the remote store
//! - [`config`] - Sync configuration (remote URL, collections, workers)
//! - [`error`] - Sync error types
//! - [`hub`] - WebSocket server serving a document store
//! - [`mapping`] - Document-to-record coercion
//! - [`protocol`] - Message types for store communication
//! - [`service`] - Bulk sync orchestration
//! - [`store`] - In-memory document store
//! - [`workers`] - Write worker pool
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_sync::{RemoteStore, SyncConfig, SyncService, WriteExecutor};
//! use bodega_db::Database;
//!
//! let config = SyncConfig::load_or_default(None);
//! let store = RemoteStore::new(&config.remote.url);
//! let executor = WriteExecutor::new(config.workers.write_workers);
//!
//! let service = SyncService::new(database, store, executor, config.collections);
//! let summary = service.sync_all().await;
//! println!("Synced {} records", summary.total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod hub;
pub mod mapping;
pub mod protocol;
pub mod service;
pub mod store;
pub mod workers;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::RemoteStore;
pub use config::{CollectionSettings, HubSettings, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use hub::{DocumentHub, HubConfig, HubHandle, DEFAULT_HUB_PORT};
pub use protocol::{Document, StoreMessage};
pub use service::{SyncService, SyncSummary};
pub use store::MemoryStore;
pub use workers::{WriteExecutor, DEFAULT_WRITE_WORKERS};
