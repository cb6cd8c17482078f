//! # Document Hub Server
//!
//! WebSocket server that serves the document store for development and tests.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Document Hub Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      DocumentHub (Axum)                         │   │
//! │  │                                                                 │   │
//! │  │  /ws endpoint ──▶ WebSocket upgrade                            │   │
//! │  │                        │                                        │   │
//! │  │                        ▼                                        │   │
//! │  │              ┌─────────────────┐       ┌──────────────┐        │   │
//! │  │              │ Request/Reply   │ ◀───▶ │ MemoryStore  │        │   │
//! │  │              │ Loop            │       │ (collections)│        │   │
//! │  │              └─────────────────┘       └──────────────┘        │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Message Flow:                                                          │
//! │  ─────────────                                                          │
//! │  1. Client sends FetchCollection / AddDocument / UpdateDocument /       │
//! │     DeleteDocument                                                      │
//! │  2. Hub replies with CollectionSnapshot / DocumentAdded / Ack / Error   │
//! │  3. One reply per request, on the same connection                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::protocol::StoreMessage;
use crate::store::MemoryStore;

// =============================================================================
// Constants
// =============================================================================

/// Default WebSocket port for the document hub.
pub const DEFAULT_HUB_PORT: u16 = 8765;

/// Maximum message size (1MB).
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

// =============================================================================
// Hub Configuration
// =============================================================================

/// Configuration for the document hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Port to listen on. Port 0 picks a free port.
    pub port: u16,
    /// Bind address (default: 0.0.0.0).
    pub bind_addr: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            port: DEFAULT_HUB_PORT,
            bind_addr: "0.0.0.0".to_string(),
        }
    }
}

impl HubConfig {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Hub Server
// =============================================================================

/// The document hub WebSocket server.
pub struct DocumentHub {
    config: HubConfig,
    store: Arc<MemoryStore>,
}

/// Handle for a running document hub.
#[derive(Clone)]
pub struct HubHandle {
    /// Actual bound address (resolved, useful with port 0).
    addr: SocketAddr,
    /// Shared document store.
    store: Arc<MemoryStore>,
    /// Shutdown signal sender.
    shutdown_tx: mpsc::Sender<()>,
}

impl HubHandle {
    /// Returns the WebSocket URL of this hub.
    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Returns the bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the backing document store.
    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    /// Shuts down the hub server.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Hub shutdown channel closed".into()))
    }
}

impl DocumentHub {
    /// Creates a new hub serving the given store.
    pub fn new(config: HubConfig, store: Arc<MemoryStore>) -> Self {
        DocumentHub { config, store }
    }

    /// Starts the hub server and returns a handle.
    pub async fn start(self) -> SyncResult<HubHandle> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        // Build the router
        let app = Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(health_handler))
            .with_state(self.store.clone());

        // Bind the listener
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            SyncError::TransportError(format!("Failed to bind to {}: {}", bind_addr, e))
        })?;

        let addr = listener
            .local_addr()
            .map_err(|e| SyncError::TransportError(format!("Failed to read bound addr: {}", e)))?;

        info!(addr = %addr, "Document hub started");

        let handle = HubHandle {
            addr,
            store: self.store,
            shutdown_tx,
        };

        // Spawn the server
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await;
                    info!("Document hub shutting down");
                })
                .await
                .ok();
        });

        Ok(handle)
    }
}

// =============================================================================
// WebSocket Handler
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(store): State<Arc<MemoryStore>>,
) -> impl IntoResponse {
    info!("New WebSocket connection");
    ws.max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, store))
}

/// Handles a WebSocket connection: one reply per request.
async fn handle_socket(socket: WebSocket, store: Arc<MemoryStore>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        match receiver.next().await {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    let reply = match StoreMessage::from_json(&text) {
                        Ok(request) => {
                            debug!(msg_type = %request.type_name(), "Handling request");
                            handle_request(&store, request).await
                        }
                        Err(e) => {
                            debug!(?e, "Invalid message format");
                            StoreMessage::error("BAD_REQUEST", &format!("Invalid JSON: {}", e))
                        }
                    };

                    match reply.to_json() {
                        Ok(json) => {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(?e, "Failed to serialize reply");
                            break;
                        }
                    }
                }
                Message::Ping(data) => {
                    let _ = sender.send(Message::Pong(data)).await;
                }
                Message::Pong(_) => {
                    // Connection is alive
                }
                Message::Binary(_) => {
                    warn!("Received unexpected binary message");
                }
                Message::Close(_) => {
                    info!("Client requested close");
                    break;
                }
            },
            Some(Err(e)) => {
                warn!(?e, "WebSocket error");
                break;
            }
            None => {
                info!("Client disconnected");
                break;
            }
        }
    }
}

/// Maps a request message to its reply.
async fn handle_request(store: &MemoryStore, request: StoreMessage) -> StoreMessage {
    match request {
        StoreMessage::FetchCollection { collection } => {
            let documents = store.snapshot(&collection).await;
            debug!(collection = %collection, count = documents.len(), "Serving snapshot");
            StoreMessage::CollectionSnapshot {
                collection,
                documents,
            }
        }

        StoreMessage::AddDocument { collection, fields } => {
            let doc_id = store.insert(&collection, fields).await;
            StoreMessage::DocumentAdded { collection, doc_id }
        }

        StoreMessage::UpdateDocument {
            collection,
            doc_id,
            fields,
        } => {
            if store.update(&collection, &doc_id, fields).await {
                StoreMessage::Ack
            } else {
                StoreMessage::error(
                    "NOT_FOUND",
                    &format!("No document {} in {}", doc_id, collection),
                )
            }
        }

        StoreMessage::DeleteDocument { collection, doc_id } => {
            if store.delete(&collection, &doc_id).await {
                StoreMessage::Ack
            } else {
                StoreMessage::error(
                    "NOT_FOUND",
                    &format!("No document {} in {}", doc_id, collection),
                )
            }
        }

        other => StoreMessage::error(
            "BAD_REQUEST",
            &format!("Unexpected message type: {}", other.type_name()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hub_config_default() {
        let config = HubConfig::default();
        assert_eq!(config.port, DEFAULT_HUB_PORT);
        assert_eq!(config.bind_addr, "0.0.0.0");
    }

    #[test]
    fn test_hub_config_bind_address() {
        let config = HubConfig {
            port: 9000,
            bind_addr: "127.0.0.1".to_string(),
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_handle_request_fetch_unknown_collection() {
        let store = MemoryStore::new();
        let reply = handle_request(&store, StoreMessage::fetch("nada")).await;

        match reply {
            StoreMessage::CollectionSnapshot { documents, .. } => {
                assert!(documents.is_empty());
            }
            other => panic!("Expected snapshot, got {}", other.type_name()),
        }
    }

    #[tokio::test]
    async fn test_handle_request_add_then_fetch() {
        let store = MemoryStore::new();

        let mut fields = serde_json::Map::new();
        fields.insert("nombre".to_string(), json!("Azucar"));

        let reply = handle_request(
            &store,
            StoreMessage::AddDocument {
                collection: "productos".to_string(),
                fields,
            },
        )
        .await;
        assert!(matches!(reply, StoreMessage::DocumentAdded { .. }));

        let reply = handle_request(&store, StoreMessage::fetch("productos")).await;
        match reply {
            StoreMessage::CollectionSnapshot { documents, .. } => {
                assert_eq!(documents.len(), 1);
            }
            other => panic!("Expected snapshot, got {}", other.type_name()),
        }
    }

    #[tokio::test]
    async fn test_handle_request_update_missing_document() {
        let store = MemoryStore::new();
        let reply = handle_request(
            &store,
            StoreMessage::UpdateDocument {
                collection: "productos".to_string(),
                doc_id: "ghost".to_string(),
                fields: serde_json::Map::new(),
            },
        )
        .await;

        match reply {
            StoreMessage::Error { code, .. } => assert_eq!(code, "NOT_FOUND"),
            other => panic!("Expected error, got {}", other.type_name()),
        }
    }
}
