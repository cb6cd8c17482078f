//! # In-Memory Document Store
//!
//! Backing storage for the document hub.
//!
//! Collections are plain maps of document id to raw fields. There is no
//! schema and no validation: the store accepts whatever field names and
//! value types a client sends, exactly like the hosted document service
//! it stands in for.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::protocol::Document;

/// Thread-safe in-memory document store.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.seed("productos", documents).await;
/// let snapshot = store.snapshot("productos").await;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// collection name -> (doc_id -> fields)
    collections: RwLock<HashMap<String, HashMap<String, Map<String, Value>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryStore::default())
    }

    /// Replaces a collection with the given documents.
    pub async fn seed(&self, collection: &str, documents: Vec<Document>) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        docs.clear();
        for doc in documents {
            docs.insert(doc.doc_id, doc.fields);
        }
    }

    /// Inserts a new document and returns its assigned id.
    pub async fn insert(&self, collection: &str, fields: Map<String, Value>) -> String {
        let doc_id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc_id.clone(), fields);
        doc_id
    }

    /// Replaces the fields of an existing document.
    ///
    /// Returns false if the collection or document doesn't exist.
    pub async fn update(&self, collection: &str, doc_id: &str, fields: Map<String, Value>) -> bool {
        let mut collections = self.collections.write().await;
        match collections.get_mut(collection) {
            Some(docs) if docs.contains_key(doc_id) => {
                docs.insert(doc_id.to_string(), fields);
                true
            }
            _ => false,
        }
    }

    /// Removes a document.
    ///
    /// Returns false if the collection or document doesn't exist.
    pub async fn delete(&self, collection: &str, doc_id: &str) -> bool {
        let mut collections = self.collections.write().await;
        match collections.get_mut(collection) {
            Some(docs) => docs.remove(doc_id).is_some(),
            None => false,
        }
    }

    /// Returns a full snapshot of a collection.
    ///
    /// An unknown collection yields an empty snapshot, matching the hosted
    /// service's behavior of auto-creating collections on first touch.
    pub async fn snapshot(&self, collection: &str) -> Vec<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(|d| d.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(name: &str) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("nombre".to_string(), json!(name));
        m
    }

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let store = MemoryStore::new();

        let id = store.insert("productos", fields("Arroz")).await;
        let snapshot = store.snapshot("productos").await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].doc_id, id);
        assert_eq!(snapshot[0].fields["nombre"], json!("Arroz"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let id = store.insert("productos", fields("Arroz")).await;

        assert!(store.update("productos", &id, fields("Arroz integral")).await);
        let snapshot = store.snapshot("productos").await;
        assert_eq!(snapshot[0].fields["nombre"], json!("Arroz integral"));

        assert!(store.delete("productos", &id).await);
        assert!(!store.delete("productos", &id).await);
        assert_eq!(store.count("productos").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.snapshot("nada").await.is_empty());
        assert!(!store.update("nada", "x", Map::new()).await);
    }

    #[tokio::test]
    async fn test_seed_replaces_collection() {
        let store = MemoryStore::new();
        store.insert("productos", fields("Viejo")).await;

        store
            .seed(
                "productos",
                vec![
                    Document::new("a", fields("Uno")),
                    Document::new("b", fields("Dos")),
                ],
            )
            .await;

        assert_eq!(store.count("productos").await, 2);
    }
}
