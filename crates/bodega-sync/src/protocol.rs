//! # Store Protocol Messages
//!
//! Message types for talking to the remote document store.
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Protocol Messages                            │
//! │                                                                         │
//! │  COLLECTION FETCH                                                       │
//! │  ────────────────                                                       │
//! │  CLIENT ───► FetchCollection { collection }                             │
//! │  STORE  ◄─── CollectionSnapshot { collection, documents: [...] }        │
//! │                                                                         │
//! │  DOCUMENT WRITES                                                        │
//! │  ───────────────                                                        │
//! │  CLIENT ───► AddDocument { collection, fields }                         │
//! │  STORE  ◄─── DocumentAdded { collection, doc_id }                       │
//! │  CLIENT ───► UpdateDocument { collection, doc_id, fields }              │
//! │  CLIENT ───► DeleteDocument { collection, doc_id }                      │
//! │  STORE  ◄─── Ack                                                        │
//! │                                                                         │
//! │  ERROR                                                                  │
//! │  ─────                                                                  │
//! │  STORE  ◄─── Error { code, message }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format (JSON)
//! Messages are serialized as tagged JSON using serde's adjacently tagged enum:
//! ```json
//! { "type": "FetchCollection", "payload": { "collection": "productos" } }
//! ```

use serde::{Deserialize, Serialize};

/// Current protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Documents
// =============================================================================

/// A loosely-typed document from the remote store.
///
/// Documents carry no schema. Field names and value types vary between
/// documents in the same collection, which is why the mapping layer has to
/// try several names and coerce each value it finds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Store-assigned document identifier, unique within the collection.
    pub doc_id: String,

    /// Raw document fields.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Creates a document with the given id and fields.
    pub fn new(doc_id: impl Into<String>, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Document {
            doc_id: doc_id.into(),
            fields,
        }
    }
}

// =============================================================================
// Main Message Enum (Tagged Union)
// =============================================================================

/// All store protocol messages.
///
/// Uses serde's adjacently tagged enum for clean JSON serialization:
/// `{ "type": "FetchCollection", "payload": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum StoreMessage {
    // =========================================================================
    // Collection Fetch
    // =========================================================================

    /// Request a full snapshot of a collection.
    FetchCollection { collection: String },

    /// Full snapshot of a collection.
    CollectionSnapshot {
        collection: String,
        documents: Vec<Document>,
    },

    // =========================================================================
    // Document Writes
    // =========================================================================

    /// Add a new document to a collection. The store assigns the id.
    AddDocument {
        collection: String,
        fields: serde_json::Map<String, serde_json::Value>,
    },

    /// Confirmation of an added document, with the assigned id.
    DocumentAdded { collection: String, doc_id: String },

    /// Replace the fields of an existing document.
    UpdateDocument {
        collection: String,
        doc_id: String,
        fields: serde_json::Map<String, serde_json::Value>,
    },

    /// Remove a document from a collection.
    DeleteDocument { collection: String, doc_id: String },

    /// Generic acknowledgement for update and delete operations.
    Ack,

    // =========================================================================
    // Error Messages
    // =========================================================================

    /// Error reply from the store.
    Error { code: String, message: String },
}

// =============================================================================
// Helper Functions
// =============================================================================

impl StoreMessage {
    /// Returns the message type name as a string (for logging).
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreMessage::FetchCollection { .. } => "FetchCollection",
            StoreMessage::CollectionSnapshot { .. } => "CollectionSnapshot",
            StoreMessage::AddDocument { .. } => "AddDocument",
            StoreMessage::DocumentAdded { .. } => "DocumentAdded",
            StoreMessage::UpdateDocument { .. } => "UpdateDocument",
            StoreMessage::DeleteDocument { .. } => "DeleteDocument",
            StoreMessage::Ack => "Ack",
            StoreMessage::Error { .. } => "Error",
        }
    }

    /// Creates a FetchCollection request.
    pub fn fetch(collection: &str) -> Self {
        StoreMessage::FetchCollection {
            collection: collection.to_string(),
        }
    }

    /// Creates an Error message.
    pub fn error(code: &str, message: &str) -> Self {
        StoreMessage::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// Serializes to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_serialization() {
        let msg = StoreMessage::fetch("productos");
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"FetchCollection\""));
        assert!(json.contains("productos"));

        let parsed = StoreMessage::from_json(&json).unwrap();
        if let StoreMessage::FetchCollection { collection } = parsed {
            assert_eq!(collection, "productos");
        } else {
            panic!("Expected FetchCollection message");
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut fields = serde_json::Map::new();
        fields.insert("nombre_producto".to_string(), json!("Arroz 1kg"));
        fields.insert("precio_unitario".to_string(), json!(23.5));

        let msg = StoreMessage::CollectionSnapshot {
            collection: "productos".to_string(),
            documents: vec![Document::new("doc-1", fields)],
        };
        let json = msg.to_json().unwrap();
        let parsed = StoreMessage::from_json(&json).unwrap();

        if let StoreMessage::CollectionSnapshot { documents, .. } = parsed {
            assert_eq!(documents.len(), 1);
            assert_eq!(documents[0].doc_id, "doc-1");
            assert_eq!(documents[0].fields["nombre_producto"], json!("Arroz 1kg"));
        } else {
            panic!("Expected CollectionSnapshot message");
        }
    }

    #[test]
    fn test_ack_serialization() {
        let json = StoreMessage::Ack.to_json().unwrap();
        assert!(json.contains("\"type\":\"Ack\""));
        assert!(matches!(
            StoreMessage::from_json(&json).unwrap(),
            StoreMessage::Ack
        ));
    }

    #[test]
    fn test_error_message() {
        let error = StoreMessage::error("UNKNOWN_COLLECTION", "No such collection");
        let json = error.to_json().unwrap();
        assert!(json.contains("UNKNOWN_COLLECTION"));
    }
}
