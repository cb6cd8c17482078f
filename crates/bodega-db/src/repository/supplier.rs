//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! Mirrors the category repository: products reference suppliers through a
//! RESTRICT foreign key, and synced rows are keyed on the remote document id.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::Supplier;

const SUPPLIER_COLUMNS: &str =
    "id, remote_id, remote_key, name, phone, email, address, city, country, created_at";

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY name");
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Checks whether a supplier with this name already exists.
    pub async fn exists_by_name(&self, name: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE name LIKE ?1")
                .bind(name.trim())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Counts the products that reference this supplier, active or not.
    pub async fn count_products(&self, id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE supplier_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Inserts a new supplier.
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            "INSERT INTO suppliers (
                id, remote_id, remote_key, name, phone, email, address, city,
                country, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&supplier.id)
        .bind(&supplier.remote_id)
        .bind(supplier.remote_key)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .bind(&supplier.country)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or updates a supplier keyed on its remote document id.
    ///
    /// The local `id` and `created_at` of an existing row are preserved.
    pub async fn upsert_remote(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(remote_id = ?supplier.remote_id, name = %supplier.name, "Upserting remote supplier");

        sqlx::query(
            "INSERT INTO suppliers (
                id, remote_id, remote_key, name, phone, email, address, city,
                country, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(remote_id) DO UPDATE SET
                remote_key = excluded.remote_key,
                name = excluded.name,
                phone = excluded.phone,
                email = excluded.email,
                address = excluded.address,
                city = excluded.city,
                country = excluded.country",
        )
        .bind(&supplier.id)
        .bind(&supplier.remote_id)
        .bind(supplier.remote_key)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .bind(&supplier.country)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a supplier.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - products still reference it
    /// * `Err(DbError::NotFound)` - supplier doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

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
    use bodega_core::{Product, FALLBACK_CATEGORY_ID};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = test_db().await;
        let repo = db.suppliers();

        let mut s = Supplier::new("Distribuidora Norte");
        s.city = Some("Monterrey".to_string());
        repo.insert(&s).await.unwrap();

        let list = repo.list().await.unwrap();
        // Fallback row is seeded by migration
        assert_eq!(list.len(), 2);
        let found = list.iter().find(|x| x.id == s.id).unwrap();
        assert_eq!(found.city.as_deref(), Some("Monterrey"));
    }

    #[tokio::test]
    async fn test_upsert_remote_is_idempotent() {
        let db = test_db().await;
        let repo = db.suppliers();

        let mut s = Supplier::new("Lacteos del Valle");
        s.remote_id = Some("sup-doc-1".to_string());
        s.remote_key = Some(3);

        repo.upsert_remote(&s).await.unwrap();

        let mut s2 = Supplier::new("Lacteos del Valle SA");
        s2.remote_id = Some("sup-doc-1".to_string());
        s2.remote_key = Some(3);
        repo.upsert_remote(&s2).await.unwrap();

        let list = repo.list().await.unwrap();
        let matches: Vec<_> = list
            .iter()
            .filter(|x| x.remote_id.as_deref() == Some("sup-doc-1"))
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Lacteos del Valle SA");
        assert_eq!(matches[0].id, s.id);
    }

    #[tokio::test]
    async fn test_delete_with_products_fails() {
        let db = test_db().await;
        let repo = db.suppliers();

        let s = Supplier::new("Carnes Selectas");
        repo.insert(&s).await.unwrap();

        let product = Product::new("Ham 200g", 450, 8, 2, FALLBACK_CATEGORY_ID, &s.id);
        db.products().insert(&product).await.unwrap();

        let err = repo.delete(&s.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete_unused_supplier() {
        let db = test_db().await;
        let repo = db.suppliers();

        let s = Supplier::new("One-off");
        repo.insert(&s).await.unwrap();
        repo.delete(&s.id).await.unwrap();

        assert!(repo.get_by_id(&s.id).await.unwrap().is_none());
    }
}
