//! # Catalog Commands
//!
//! Categories, suppliers, and the inventory stats report.

use serde::{Deserialize, Serialize};
use tracing::info;

use bodega_core::validation::validate_name;
use bodega_core::{Category, CoreError, Money, Supplier};

use crate::error::ApiError;
use crate::state::AppState;

/// Category DTO with the number of products it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
}

/// Supplier DTO with the number of products it supplies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub product_count: i64,
}

/// Inventory summary shown by the `stats` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub active_products: i64,
    pub low_stock_products: i64,
    pub inventory_value_cents: i64,
    pub inventory_value_display: String,
}

/// Lists all categories with their product counts.
pub async fn list_categories(state: &AppState) -> Result<Vec<CategoryDto>, ApiError> {
    let repo = state.db().categories();
    let categories = repo.list().await?;

    let mut dtos = Vec::with_capacity(categories.len());
    for category in categories {
        let product_count = repo.count_products(&category.id).await?;
        dtos.push(CategoryDto {
            id: category.id,
            name: category.name,
            description: category.description,
            product_count,
        });
    }
    Ok(dtos)
}

/// Lists all suppliers with their product counts.
pub async fn list_suppliers(state: &AppState) -> Result<Vec<SupplierDto>, ApiError> {
    let repo = state.db().suppliers();
    let suppliers = repo.list().await?;

    let mut dtos = Vec::with_capacity(suppliers.len());
    for supplier in suppliers {
        let product_count = repo.count_products(&supplier.id).await?;
        dtos.push(SupplierDto {
            id: supplier.id,
            name: supplier.name,
            phone: supplier.phone,
            email: supplier.email,
            city: supplier.city,
            product_count,
        });
    }
    Ok(dtos)
}

/// Creates a category. Duplicate names are rejected.
pub async fn create_category(state: &AppState, name: &str) -> Result<CategoryDto, ApiError> {
    validate_name(name)?;

    let repo = state.db().categories();
    if repo.exists_by_name(name.trim()).await? {
        return Err(ApiError::validation(format!(
            "Category '{}' already exists",
            name.trim()
        )));
    }

    let category = Category::new(name.trim());
    let to_insert = category.clone();
    state
        .executor()
        .submit(async move { repo.insert(&to_insert).await })
        .await??;
    info!(id = %category.id, name = %category.name, "Category created");

    Ok(CategoryDto {
        id: category.id,
        name: category.name,
        description: category.description,
        product_count: 0,
    })
}

/// Creates a supplier. Duplicate names are rejected.
pub async fn create_supplier(state: &AppState, name: &str) -> Result<SupplierDto, ApiError> {
    validate_name(name)?;

    let repo = state.db().suppliers();
    if repo.exists_by_name(name.trim()).await? {
        return Err(ApiError::validation(format!(
            "Supplier '{}' already exists",
            name.trim()
        )));
    }

    let supplier = Supplier::new(name.trim());
    let to_insert = supplier.clone();
    state
        .executor()
        .submit(async move { repo.insert(&to_insert).await })
        .await??;
    info!(id = %supplier.id, name = %supplier.name, "Supplier created");

    Ok(SupplierDto {
        id: supplier.id,
        name: supplier.name,
        phone: supplier.phone,
        email: supplier.email,
        city: supplier.city,
        product_count: 0,
    })
}

/// Deletes a category. Fails while any product still references it.
pub async fn delete_category(state: &AppState, id: &str) -> Result<(), ApiError> {
    let repo = state.db().categories();
    let category = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;

    let count = repo.count_products(id).await?;
    if count > 0 {
        return Err(CoreError::StillReferenced {
            entity: "Category".to_string(),
            name: category.name,
            count,
        }
        .into());
    }

    let category_id = id.to_string();
    state
        .executor()
        .submit(async move { repo.delete(&category_id).await })
        .await??;
    info!(id = %id, "Category deleted");
    Ok(())
}

/// Deletes a supplier. Fails while any product still references it.
pub async fn delete_supplier(state: &AppState, id: &str) -> Result<(), ApiError> {
    let repo = state.db().suppliers();
    let supplier = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier", id))?;

    let count = repo.count_products(id).await?;
    if count > 0 {
        return Err(CoreError::StillReferenced {
            entity: "Supplier".to_string(),
            name: supplier.name,
            count,
        }
        .into());
    }

    let supplier_id = id.to_string();
    state
        .executor()
        .submit(async move { repo.delete(&supplier_id).await })
        .await??;
    info!(id = %id, "Supplier deleted");
    Ok(())
}

/// Builds the inventory stats report.
pub async fn inventory_stats(state: &AppState) -> Result<InventoryStats, ApiError> {
    let products = state.db().products();

    let active_products = products.count_active().await?;
    let low_stock_products = products.low_stock().await?.len() as i64;
    let inventory_value_cents = products.inventory_value().await?;

    Ok(InventoryStats {
        active_products,
        low_stock_products,
        inventory_value_cents,
        inventory_value_display: Money::from_cents(inventory_value_cents).to_string(),
    })
}
