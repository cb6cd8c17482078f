//! # Sync Service
//!
//! Orchestrates the one-way bulk sync from the remote store into the
//! local cache.
//!
//! ## Sync Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sync_all                                       │
//! │                                                                         │
//! │  1. categorias  ──► map ──► upsert (via write pool)                     │
//! │  2. proveedores ──► map ──► upsert (via write pool)                     │
//! │  3. productos   ──► map ──► resolve refs ──► upsert (via write pool)    │
//! │                                                                         │
//! │  Reference resolution (step 3):                                         │
//! │    product.id_categoria = 3  ──► remote_key 3 ──► local category id     │
//! │    unresolvable / absent     ──► fallback category ("Uncategorized")    │
//! │                                                                         │
//! │  A failed collection is recorded and the pass continues with the next   │
//! │  one. A bad document is recorded and the rest of its collection still   │
//! │  applies. Errors come back as strings in the SyncSummary; nothing       │
//! │  retries automatically.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::{info, warn};

use bodega_core::{Category, Product, Supplier, FALLBACK_CATEGORY_ID, FALLBACK_SUPPLIER_ID};
use bodega_db::Database;

use crate::client::RemoteStore;
use crate::config::CollectionSettings;
use crate::mapping::{map_category, map_product, map_supplier};
use crate::workers::WriteExecutor;

// =============================================================================
// Sync Summary
// =============================================================================

/// Outcome of a sync pass.
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Categories applied to the local cache.
    pub categories: usize,

    /// Suppliers applied to the local cache.
    pub suppliers: usize,

    /// Products applied to the local cache.
    pub products: usize,

    /// One human-readable message per collection or document failure.
    pub errors: Vec<String>,
}

impl SyncSummary {
    /// True if every document of every collection applied cleanly.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total records applied.
    pub fn total(&self) -> usize {
        self.categories + self.suppliers + self.products
    }
}

// =============================================================================
// Sync Service
// =============================================================================

/// One-way bulk sync from the remote store to the local cache.
///
/// ## Usage
/// ```rust,ignore
/// let service = SyncService::new(db, store, executor, collections);
/// let summary = service.sync_all().await;
/// println!("Synced {} records, {} errors", summary.total(), summary.errors.len());
/// ```
pub struct SyncService {
    db: Database,
    store: RemoteStore,
    executor: WriteExecutor,
    collections: CollectionSettings,
}

impl SyncService {
    /// Creates a new sync service.
    pub fn new(
        db: Database,
        store: RemoteStore,
        executor: WriteExecutor,
        collections: CollectionSettings,
    ) -> Self {
        SyncService {
            db,
            store,
            executor,
            collections,
        }
    }

    /// Syncs categories, suppliers, then products.
    ///
    /// Categories and suppliers go first so product references can resolve
    /// against freshly-synced rows.
    pub async fn sync_all(&self) -> SyncSummary {
        info!(url = %self.store.url(), "Starting full sync");
        let mut summary = SyncSummary::default();

        self.sync_categories(&mut summary).await;
        self.sync_suppliers(&mut summary).await;
        self.sync_product_collection(&mut summary).await;

        info!(
            categories = summary.categories,
            suppliers = summary.suppliers,
            products = summary.products,
            errors = summary.errors.len(),
            "Full sync finished"
        );
        summary
    }

    /// Products-only refresh.
    ///
    /// References resolve against whatever categories and suppliers the
    /// local cache already holds.
    pub async fn sync_products(&self) -> SyncSummary {
        info!(url = %self.store.url(), "Starting product refresh");
        let mut summary = SyncSummary::default();
        self.sync_product_collection(&mut summary).await;
        summary
    }

    // =========================================================================
    // Per-Collection Passes
    // =========================================================================

    async fn sync_categories(&self, summary: &mut SyncSummary) {
        let collection = &self.collections.categories;
        let documents = match self.store.fetch_collection(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(collection = %collection, %e, "Collection fetch failed");
                summary.errors.push(format!("{}: {}", collection, e));
                return;
            }
        };

        for doc in &documents {
            let mapped = match map_category(doc) {
                Ok(mapped) => mapped,
                Err(e) => {
                    warn!(collection = %collection, %e, "Skipping document");
                    summary.errors.push(e.to_string());
                    continue;
                }
            };

            let mut category = Category::new(mapped.name);
            category.remote_id = Some(mapped.remote_id);
            category.remote_key = mapped.remote_key;
            category.description = mapped.description;

            let categories = self.db.categories();
            let result = self
                .executor
                .submit(async move { categories.upsert_remote(&category).await })
                .await;

            match result {
                Ok(Ok(())) => summary.categories += 1,
                Ok(Err(e)) => summary.errors.push(format!("{}: {}", collection, e)),
                Err(e) => summary.errors.push(format!("{}: {}", collection, e)),
            }
        }
    }

    async fn sync_suppliers(&self, summary: &mut SyncSummary) {
        let collection = &self.collections.suppliers;
        let documents = match self.store.fetch_collection(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(collection = %collection, %e, "Collection fetch failed");
                summary.errors.push(format!("{}: {}", collection, e));
                return;
            }
        };

        for doc in &documents {
            let mapped = match map_supplier(doc) {
                Ok(mapped) => mapped,
                Err(e) => {
                    warn!(collection = %collection, %e, "Skipping document");
                    summary.errors.push(e.to_string());
                    continue;
                }
            };

            let mut supplier = Supplier::new(mapped.name);
            supplier.remote_id = Some(mapped.remote_id);
            supplier.remote_key = mapped.remote_key;
            supplier.phone = mapped.phone;
            supplier.email = mapped.email;
            supplier.address = mapped.address;
            supplier.city = mapped.city;
            supplier.country = mapped.country;

            let suppliers = self.db.suppliers();
            let result = self
                .executor
                .submit(async move { suppliers.upsert_remote(&supplier).await })
                .await;

            match result {
                Ok(Ok(())) => summary.suppliers += 1,
                Ok(Err(e)) => summary.errors.push(format!("{}: {}", collection, e)),
                Err(e) => summary.errors.push(format!("{}: {}", collection, e)),
            }
        }
    }

    async fn sync_product_collection(&self, summary: &mut SyncSummary) {
        let collection = &self.collections.products;
        let documents = match self.store.fetch_collection(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(collection = %collection, %e, "Collection fetch failed");
                summary.errors.push(format!("{}: {}", collection, e));
                return;
            }
        };

        // Reference maps: remote business key -> local row id
        let (category_ids, supplier_ids) = match self.reference_maps(summary).await {
            Some(maps) => maps,
            None => return,
        };

        for doc in &documents {
            let mapped = match map_product(doc) {
                Ok(mapped) => mapped,
                Err(e) => {
                    warn!(collection = %collection, %e, "Skipping document");
                    summary.errors.push(e.to_string());
                    continue;
                }
            };

            let category_id = mapped
                .category_key
                .and_then(|key| category_ids.get(&key).cloned())
                .unwrap_or_else(|| FALLBACK_CATEGORY_ID.to_string());
            let supplier_id = mapped
                .supplier_key
                .and_then(|key| supplier_ids.get(&key).cloned())
                .unwrap_or_else(|| FALLBACK_SUPPLIER_ID.to_string());

            let mut product = Product::new(
                mapped.name,
                mapped.price_cents,
                mapped.current_stock,
                mapped.min_stock,
                category_id,
                supplier_id,
            );
            product.remote_id = Some(mapped.remote_id);
            product.description = mapped.description;
            product.barcode = mapped.barcode;
            product.is_active = mapped.is_active;

            let products = self.db.products();
            let result = self
                .executor
                .submit(async move { products.upsert_remote(&product).await })
                .await;

            match result {
                Ok(Ok(())) => summary.products += 1,
                Ok(Err(e)) => summary.errors.push(format!("{}: {}", collection, e)),
                Err(e) => summary.errors.push(format!("{}: {}", collection, e)),
            }
        }
    }

    /// Builds remote-key to local-id maps from the local cache.
    async fn reference_maps(
        &self,
        summary: &mut SyncSummary,
    ) -> Option<(HashMap<i64, String>, HashMap<i64, String>)> {
        let categories = match self.db.categories().list().await {
            Ok(rows) => rows,
            Err(e) => {
                summary.errors.push(format!("categories: {}", e));
                return None;
            }
        };
        let suppliers = match self.db.suppliers().list().await {
            Ok(rows) => rows,
            Err(e) => {
                summary.errors.push(format!("suppliers: {}", e));
                return None;
            }
        };

        let category_ids = categories
            .into_iter()
            .filter_map(|c| c.remote_key.map(|key| (key, c.id)))
            .collect();
        let supplier_ids = suppliers
            .into_iter()
            .filter_map(|s| s.remote_key.map(|key| (key, s.id)))
            .collect();

        Some((category_ids, supplier_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let summary = SyncSummary {
            categories: 2,
            suppliers: 1,
            products: 10,
            errors: vec![],
        };
        assert_eq!(summary.total(), 13);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_summary_with_errors() {
        let summary = SyncSummary {
            errors: vec!["productos: connection refused".to_string()],
            ..Default::default()
        };
        assert!(!summary.is_clean());
        assert_eq!(summary.total(), 0);
    }
}
