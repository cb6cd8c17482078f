//! # Remote Store Client
//!
//! WebSocket client for the remote document store.
//!
//! Each operation opens a connection, sends one request, waits for the
//! matching reply, and closes. A failed connection fails the operation;
//! there is no retry or reconnect layer, callers decide whether to run
//! the sync again.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::protocol::{Document, StoreMessage};

/// Default timeout for connecting and for waiting on a reply.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client for the remote document store.
///
/// ## Usage
/// ```rust,ignore
/// let store = RemoteStore::new("ws://192.168.1.50:8765/ws");
/// let docs = store.fetch_collection("productos").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteStore {
    /// WebSocket URL of the store.
    url: String,

    /// Timeout for connect and reply.
    connect_timeout: Duration,
}

impl RemoteStore {
    /// Creates a client for the given WebSocket URL.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteStore {
            url: url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the connect/reply timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the store URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetches a full snapshot of a collection.
    pub async fn fetch_collection(&self, collection: &str) -> SyncResult<Vec<Document>> {
        let reply = self.request(StoreMessage::fetch(collection)).await?;

        match reply {
            StoreMessage::CollectionSnapshot {
                collection: replied,
                documents,
            } => {
                if replied != collection {
                    return Err(SyncError::InvalidMessage(format!(
                        "Snapshot for '{}' while fetching '{}'",
                        replied, collection
                    )));
                }
                debug!(collection = %collection, count = documents.len(), "Fetched snapshot");
                Ok(documents)
            }
            other => Err(unexpected("CollectionSnapshot", other)),
        }
    }

    /// Adds a document and returns the store-assigned id.
    pub async fn add_document(
        &self,
        collection: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> SyncResult<String> {
        let reply = self
            .request(StoreMessage::AddDocument {
                collection: collection.to_string(),
                fields,
            })
            .await?;

        match reply {
            StoreMessage::DocumentAdded { doc_id, .. } => Ok(doc_id),
            other => Err(unexpected("DocumentAdded", other)),
        }
    }

    /// Replaces the fields of an existing document.
    pub async fn update_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> SyncResult<()> {
        let reply = self
            .request(StoreMessage::UpdateDocument {
                collection: collection.to_string(),
                doc_id: doc_id.to_string(),
                fields,
            })
            .await?;

        match reply {
            StoreMessage::Ack => Ok(()),
            other => Err(unexpected("Ack", other)),
        }
    }

    /// Removes a document.
    pub async fn delete_document(&self, collection: &str, doc_id: &str) -> SyncResult<()> {
        let reply = self
            .request(StoreMessage::DeleteDocument {
                collection: collection.to_string(),
                doc_id: doc_id.to_string(),
            })
            .await?;

        match reply {
            StoreMessage::Ack => Ok(()),
            other => Err(unexpected("Ack", other)),
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Sends one request and waits for its reply.
    async fn request(&self, message: StoreMessage) -> SyncResult<StoreMessage> {
        let mut ws_stream = self.connect_with_timeout().await?;

        let json = message.to_json()?;
        debug!(msg_type = %message.type_name(), "Sending request");
        ws_stream.send(WsMessage::Text(json.into())).await?;

        let reply = self.read_reply(&mut ws_stream).await;

        // Best-effort close, the reply is already in hand
        let _ = ws_stream.close(None).await;

        match reply? {
            StoreMessage::Error { code, message } => Err(SyncError::Rejected { code, message }),
            other => Ok(other),
        }
    }

    /// Connects with timeout.
    async fn connect_with_timeout(&self) -> SyncResult<WsStream> {
        let connect_future = connect_async(&self.url);

        match timeout(self.connect_timeout, connect_future).await {
            Ok(Ok((ws_stream, response))) => {
                debug!(status = ?response.status(), "WebSocket handshake complete");
                Ok(ws_stream)
            }
            Ok(Err(e)) => Err(SyncError::from(e)),
            Err(_) => Err(SyncError::Timeout(self.connect_timeout.as_secs())),
        }
    }

    /// Reads frames until a text reply arrives.
    async fn read_reply(&self, ws_stream: &mut WsStream) -> SyncResult<StoreMessage> {
        let deadline = tokio::time::sleep(self.connect_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                frame = ws_stream.next() => {
                    match frame {
                        Some(Ok(WsMessage::Text(text))) => {
                            let msg = StoreMessage::from_json(&text)
                                .map_err(|e| SyncError::DeserializationFailed(e.to_string()))?;
                            debug!(msg_type = %msg.type_name(), "Received reply");
                            return Ok(msg);
                        }
                        Some(Ok(WsMessage::Ping(data))) => {
                            ws_stream.send(WsMessage::Pong(data)).await?;
                        }
                        Some(Ok(WsMessage::Pong(_))) => {
                            // Keepalive, keep waiting
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            warn!(?frame, "Connection closed before reply");
                            return Err(SyncError::Disconnected);
                        }
                        Some(Ok(WsMessage::Binary(_))) => {
                            warn!("Received unexpected binary message");
                        }
                        Some(Ok(WsMessage::Frame(_))) => {
                            // Raw frame, ignore
                        }
                        Some(Err(e)) => return Err(SyncError::from(e)),
                        None => return Err(SyncError::Disconnected),
                    }
                }
                _ = &mut deadline => {
                    return Err(SyncError::Timeout(self.connect_timeout.as_secs()));
                }
            }
        }
    }
}

/// Builds an UnexpectedMessageType error.
fn unexpected(expected: &str, actual: StoreMessage) -> SyncError {
    SyncError::UnexpectedMessageType {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let store = RemoteStore::new("ws://localhost:8765/ws")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(store.url(), "ws://localhost:8765/ws");
        assert_eq!(store.connect_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_connect_failure_surfaces_error() {
        // Nothing listens on this port
        let store = RemoteStore::new("ws://127.0.0.1:1/ws")
            .with_timeout(Duration::from_secs(2));

        let err = store.fetch_collection("productos").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::ConnectionFailed(_) | SyncError::Timeout(_) | SyncError::WebSocketError(_)
        ));
    }
}
