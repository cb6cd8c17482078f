//! # Domain Types
//!
//! Core domain types used throughout Bodega.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │    Supplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  remote_id      │   │  remote_id      │   │  remote_id      │       │
//! │  │  name           │──►│  remote_key     │   │  remote_key     │       │
//! │  │  price_cents    │   │  name           │   │  name           │       │
//! │  │  current_stock  │   │                 │   │  phone/email    │       │
//! │  │  min_stock      │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `remote_id`: document id in the remote store - set only on synced rows
//! - `remote_key`: the remote system's numeric business id (categories and
//!   suppliers only) - used to resolve product references during sync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Document id in the remote store, if this row came from a sync.
    pub remote_id: Option<String>,

    /// Display name shown in lists and detail views.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level.
    pub current_stock: i64,

    /// Minimum stock level before the product is flagged low.
    pub min_stock: i64,

    /// Category this product belongs to.
    pub category_id: String,

    /// Supplier this product is bought from.
    pub supplier_id: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns true if the product is at or below its minimum stock level.
    ///
    /// Low stock is always derived on read, never stored.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    /// Returns the total value of this product's stock (price × quantity).
    #[inline]
    pub fn inventory_value(&self) -> Money {
        Money::from_cents(self.price_cents * self.current_stock)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Document id in the remote store, if synced.
    pub remote_id: Option<String>,

    /// Numeric business key carried by remote documents.
    /// Products reference their category through this key during sync.
    pub remote_key: Option<i64>,

    /// Category name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A product supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Document id in the remote store, if synced.
    pub remote_id: Option<String>,

    /// Numeric business key carried by remote documents.
    pub remote_key: Option<i64>,

    /// Supplier name.
    pub name: String,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Contact email address.
    pub email: Option<String>,

    /// Street address.
    pub address: Option<String>,

    /// City.
    pub city: Option<String>,

    /// Country.
    pub country: Option<String>,

    /// When the supplier was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Constructors
// =============================================================================

/// Generates a new entity id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Product {
    /// Creates a new active product with generated id and current timestamps.
    pub fn new(
        name: impl Into<String>,
        price_cents: i64,
        current_stock: i64,
        min_stock: i64,
        category_id: impl Into<String>,
        supplier_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Product {
            id: generate_id(),
            remote_id: None,
            name: name.into(),
            description: None,
            price_cents,
            current_stock,
            min_stock,
            category_id: category_id.into(),
            supplier_id: supplier_id.into(),
            barcode: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Category {
    /// Creates a new category with generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            id: generate_id(),
            remote_id: None,
            remote_key: None,
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}

impl Supplier {
    /// Creates a new supplier with generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Supplier {
            id: generate_id(),
            remote_id: None,
            remote_key: None,
            name: name.into(),
            phone: None,
            email: None,
            address: None,
            city: None,
            country: None,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(current: i64, min: i64) -> Product {
        Product::new("Rice 1kg", 250, current, min, "cat-1", "sup-1")
    }

    #[test]
    fn test_low_stock_at_threshold() {
        // current == min counts as low
        assert!(product(5, 5).is_low_stock());
    }

    #[test]
    fn test_low_stock_below_threshold() {
        assert!(product(2, 5).is_low_stock());
        assert!(product(0, 0).is_low_stock());
    }

    #[test]
    fn test_not_low_stock_above_threshold() {
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn test_inventory_value() {
        let p = product(10, 2);
        assert_eq!(p.inventory_value().cents(), 2500);
    }

    #[test]
    fn test_new_product_is_active() {
        let p = product(1, 1);
        assert!(p.is_active);
        assert!(p.remote_id.is_none());
        assert_eq!(p.created_at, p.updated_at);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
