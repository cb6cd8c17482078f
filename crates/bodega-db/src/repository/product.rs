//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Active list, substring search, low-stock filter
//! - CRUD with soft delete
//! - Absolute stock updates
//! - Upsert keyed on the remote document id (sync path)
//!
//! ## Low-Stock Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Low-Stock Filter Works                       │
//! │                                                                         │
//! │  Low stock is never stored - it is derived per row on read:             │
//! │                                                                         │
//! │      WHERE current_stock <= min_stock AND is_active = 1                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │ Rice 1kg   | stock  2 | min  5 │ ← MATCH (below)                     │
//! │  │ Beans 500g | stock  5 | min  5 │ ← MATCH (at threshold)              │
//! │  │ Oil 1L     | stock 20 | min  5 │                                     │
//! │  └─────────────────────────────────────────┘                            │
//! │                                                                         │
//! │  Results ordered by current_stock ascending: emptiest shelf first       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::Product;

/// Column list shared by the product SELECT queries.
const PRODUCT_COLUMNS: &str = "id, remote_id, name, description, price_cents, \
     current_stock, min_stock, category_id, supplier_id, barcode, is_active, \
     created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search_by_name("rice").await?;
/// let low = repo.low_stock().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists all active products, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches active products by name substring (case-insensitive).
    ///
    /// An empty query returns the full active list.
    pub async fn search_by_name(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list_active().await;
        }

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND name LIKE '%' || ?1 || '%' \
             ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active products at or below their minimum stock level,
    /// emptiest shelf first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND current_stock <= min_stock \
             ORDER BY current_stock ASC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists active products in a category, ordered by name.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND category_id = ?1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists active products from a supplier, ordered by name.
    pub async fn list_by_supplier(&self, supplier_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND supplier_id = ?1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// Soft-deleted products are still returned here: the row exists,
    /// it is only hidden from the active listings.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets an active product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE barcode = ?1 AND is_active = 1"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Counts active products.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Total value of the active inventory (Σ price × stock), in cents.
    pub async fn inventory_value(&self) -> DbResult<i64> {
        let value: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(price_cents * current_stock) FROM products WHERE is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(value.unwrap_or(0))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode or remote id already exists
    /// * `Err(DbError::ForeignKeyViolation)` - unknown category or supplier
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, remote_id, name, description, price_cents,
                current_stock, min_stock, category_id, supplier_id, barcode,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&product.id)
        .bind(&product.remote_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.current_stock)
        .bind(product.min_stock)
        .bind(&product.category_id)
        .bind(&product.supplier_id)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product and refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                current_stock = ?5,
                min_stock = ?6,
                category_id = ?7,
                supplier_id = ?8,
                barcode = ?9,
                is_active = ?10,
                updated_at = ?11
            WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.current_stock)
        .bind(product.min_stock)
        .bind(&product.category_id)
        .bind(&product.supplier_id)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Sets the product stock to an absolute value and refreshes `updated_at`.
    ///
    /// The caller validates the value; this method only writes it.
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock = %stock, "Setting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET current_stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = 0.
    ///
    /// ## Why Soft Delete?
    /// - The row stays in storage and can be restored
    /// - A re-sync can reactivate it by remote id
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Inserts or updates a product keyed on its remote document id.
    ///
    /// Rows synced from the remote store go through here: the first sync
    /// inserts, every following sync updates in place. The local `id` and
    /// `created_at` of an existing row are preserved.
    pub async fn upsert_remote(&self, product: &Product) -> DbResult<()> {
        debug!(remote_id = ?product.remote_id, name = %product.name, "Upserting remote product");

        sqlx::query(
            "INSERT INTO products (
                id, remote_id, name, description, price_cents,
                current_stock, min_stock, category_id, supplier_id, barcode,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(remote_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                price_cents = excluded.price_cents,
                current_stock = excluded.current_stock,
                min_stock = excluded.min_stock,
                category_id = excluded.category_id,
                supplier_id = excluded.supplier_id,
                barcode = excluded.barcode,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at",
        )
        .bind(&product.id)
        .bind(&product.remote_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.current_stock)
        .bind(product.min_stock)
        .bind(&product.category_id)
        .bind(&product.supplier_id)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::{FALLBACK_CATEGORY_ID, FALLBACK_SUPPLIER_ID};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, stock: i64, min: i64) -> Product {
        Product::new(name, 199, stock, min, FALLBACK_CATEGORY_ID, FALLBACK_SUPPLIER_ID)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let p = product("Rice 1kg", 10, 3);
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Rice 1kg");
        assert_eq!(loaded.current_stock, 10);
        assert!(loaded.is_active);
    }

    #[tokio::test]
    async fn test_list_active_ordered_by_name() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("Zucchini", 1, 0)).await.unwrap();
        repo.insert(&product("Apple", 1, 0)).await.unwrap();

        let list = repo.list_active().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Apple");
        assert_eq!(list[1].name, "Zucchini");
    }

    #[tokio::test]
    async fn test_search_by_name_substring() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("Brown rice", 5, 1)).await.unwrap();
        repo.insert(&product("White rice", 5, 1)).await.unwrap();
        repo.insert(&product("Olive oil", 5, 1)).await.unwrap();

        let hits = repo.search_by_name("rice").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.name.contains("rice")));

        // Empty query returns everything active
        let all = repo.search_by_name("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_low_stock_classification() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("At threshold", 5, 5)).await.unwrap();
        repo.insert(&product("Below", 1, 5)).await.unwrap();
        repo.insert(&product("Plenty", 50, 5)).await.unwrap();

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 2);
        // Ordered by current_stock ascending
        assert_eq!(low[0].name, "Below");
        assert_eq!(low[1].name, "At threshold");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_active_list_only() {
        let db = test_db().await;
        let repo = db.products();

        let p = product("Doomed", 5, 1);
        repo.insert(&p).await.unwrap();
        repo.soft_delete(&p.id).await.unwrap();

        // Gone from the active list and search
        assert!(repo.list_active().await.unwrap().is_empty());
        assert!(repo.search_by_name("Doomed").await.unwrap().is_empty());
        assert_eq!(repo.count_active().await.unwrap(), 0);

        // Still in storage
        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);
    }

    #[tokio::test]
    async fn test_set_stock() {
        let db = test_db().await;
        let repo = db.products();

        let p = product("Beans", 5, 1);
        repo.insert(&p).await.unwrap();

        repo.set_stock(&p.id, 42).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_stock, 42);
        assert!(loaded.updated_at >= p.updated_at);
    }

    #[tokio::test]
    async fn test_set_stock_unknown_product() {
        let db = test_db().await;
        let err = db.products().set_stock("no-such-id", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let mut p = product("Milk 1L", 5, 1);
        p.barcode = Some("7501031311309".to_string());
        repo.insert(&p).await.unwrap();

        let found = repo.get_by_barcode("7501031311309").await.unwrap();
        assert_eq!(found.unwrap().id, p.id);
        assert!(repo.get_by_barcode("000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_remote_is_idempotent() {
        let db = test_db().await;
        let repo = db.products();

        let mut p = product("Synced", 5, 1);
        p.remote_id = Some("doc-1".to_string());

        repo.upsert_remote(&p).await.unwrap();
        assert_eq!(repo.count_active().await.unwrap(), 1);

        // Second upsert with the same remote id updates in place
        let mut p2 = product("Synced v2", 9, 1);
        p2.remote_id = Some("doc-1".to_string());
        repo.upsert_remote(&p2).await.unwrap();

        assert_eq!(repo.count_active().await.unwrap(), 1);
        let list = repo.list_active().await.unwrap();
        assert_eq!(list[0].name, "Synced v2");
        assert_eq!(list[0].current_stock, 9);
        // Local id of the first insert is preserved
        assert_eq!(list[0].id, p.id);
    }

    #[tokio::test]
    async fn test_inventory_value() {
        let db = test_db().await;
        let repo = db.products();

        // Empty inventory sums to zero, not NULL
        assert_eq!(repo.inventory_value().await.unwrap(), 0);

        let mut a = product("A", 10, 1);
        a.price_cents = 100;
        let mut b = product("B", 2, 1);
        b.price_cents = 250;
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        assert_eq!(repo.inventory_value().await.unwrap(), 100 * 10 + 250 * 2);

        // Soft-deleted rows don't count
        repo.soft_delete(&b.id).await.unwrap();
        assert_eq!(repo.inventory_value().await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_fails() {
        let db = test_db().await;
        let mut p = product("Orphan", 1, 0);
        p.category_id = "00000000-0000-0000-0000-00000000dead".to_string();

        let err = db.products().insert(&p).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
