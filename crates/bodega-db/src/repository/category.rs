//! # Category Repository
//!
//! Database operations for product categories.
//!
//! Categories are referenced by products through a RESTRICT foreign key,
//! so a category with products attached cannot be deleted.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::Category;

const CATEGORY_COLUMNS: &str =
    "id, remote_id, remote_key, name, description, created_at";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Checks whether a category with this name already exists
    /// (case-insensitive, as SQLite LIKE compares ASCII).
    pub async fn exists_by_name(&self, name: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name LIKE ?1")
                .bind(name.trim())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Counts the products that reference this category, active or not.
    pub async fn count_products(&self, id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Inserts a new category.
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            "INSERT INTO categories (id, remote_id, remote_key, name, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&category.id)
        .bind(&category.remote_id)
        .bind(category.remote_key)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or updates a category keyed on its remote document id.
    ///
    /// The local `id` and `created_at` of an existing row are preserved.
    pub async fn upsert_remote(&self, category: &Category) -> DbResult<()> {
        debug!(remote_id = ?category.remote_id, name = %category.name, "Upserting remote category");

        sqlx::query(
            "INSERT INTO categories (id, remote_id, remote_key, name, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(remote_id) DO UPDATE SET
                remote_key = excluded.remote_key,
                name = excluded.name,
                description = excluded.description",
        )
        .bind(&category.id)
        .bind(&category.remote_id)
        .bind(category.remote_key)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - products still reference it
    /// * `Err(DbError::NotFound)` - category doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
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
    use bodega_core::{Product, FALLBACK_SUPPLIER_ID};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = test_db().await;
        let repo = db.categories();

        repo.insert(&Category::new("Drinks")).await.unwrap();
        repo.insert(&Category::new("Bakery")).await.unwrap();

        let list = repo.list().await.unwrap();
        // Fallback row is seeded by migration
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].name, "Bakery");
        assert_eq!(list[1].name, "Drinks");
    }

    #[tokio::test]
    async fn test_exists_by_name() {
        let db = test_db().await;
        let repo = db.categories();

        repo.insert(&Category::new("Snacks")).await.unwrap();

        assert!(repo.exists_by_name("Snacks").await.unwrap());
        assert!(repo.exists_by_name("snacks").await.unwrap());
        assert!(!repo.exists_by_name("Frozen").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_remote_is_idempotent() {
        let db = test_db().await;
        let repo = db.categories();

        let mut cat = Category::new("Dairy");
        cat.remote_id = Some("cat-doc-1".to_string());
        cat.remote_key = Some(7);

        repo.upsert_remote(&cat).await.unwrap();
        repo.upsert_remote(&cat).await.unwrap();

        let list = repo.list().await.unwrap();
        let dairy: Vec<_> = list.iter().filter(|c| c.name == "Dairy").collect();
        assert_eq!(dairy.len(), 1);
        assert_eq!(dairy[0].remote_key, Some(7));
        assert_eq!(dairy[0].id, cat.id);
    }

    #[tokio::test]
    async fn test_delete_with_products_fails() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = Category::new("Cleaning");
        repo.insert(&cat).await.unwrap();

        let product = Product::new("Soap", 150, 10, 2, &cat.id, FALLBACK_SUPPLIER_ID);
        db.products().insert(&product).await.unwrap();

        assert_eq!(repo.count_products(&cat.id).await.unwrap(), 1);

        let err = repo.delete(&cat.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = Category::new("Seasonal");
        repo.insert(&cat).await.unwrap();
        repo.delete(&cat.id).await.unwrap();

        assert!(repo.get_by_id(&cat.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_category() {
        let db = test_db().await;
        let err = db.categories().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
