//! # Product Commands
//!
//! Listing, search, low-stock report, stock adjustment, and soft delete.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bodega_core::validation::{
    validate_barcode, validate_min_stock, validate_name, validate_price_cents,
    validate_search_query, validate_stock,
};
use bodega_core::{Money, Product, FALLBACK_CATEGORY_ID, FALLBACK_SUPPLIER_ID};

use crate::error::ApiError;
use crate::state::AppState;

/// Product DTO (Data Transfer Object) for display and JSON output.
///
/// ## Why DTO?
/// - Decouples the domain model from the presentation
/// - Carries derived fields (`lowStock`, formatted price)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub price_display: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub low_stock: bool,
    pub category_id: String,
    pub supplier_id: String,
    pub barcode: Option<String>,
    pub is_active: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let low_stock = p.is_low_stock();
        let price_display = Money::from_cents(p.price_cents).to_string();
        ProductDto {
            id: p.id,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            price_display,
            current_stock: p.current_stock,
            min_stock: p.min_stock,
            low_stock,
            category_id: p.category_id,
            supplier_id: p.supplier_id,
            barcode: p.barcode,
            is_active: p.is_active,
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
    pub name: String,
    pub price_cents: i64,
    pub current_stock: i64,
    pub min_stock: i64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// Input for editing a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// Lists all active products, ordered by name.
pub async fn list_products(state: &AppState) -> Result<Vec<ProductDto>, ApiError> {
    let products = state.db().products().list_active().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Searches active products by name substring.
pub async fn search_products(state: &AppState, query: &str) -> Result<Vec<ProductDto>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_products command");

    let products = state.db().products().search_by_name(&query).await?;
    info!(count = products.len(), query = %query, "search complete");

    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Lists products at or below their minimum stock level.
pub async fn low_stock_products(state: &AppState) -> Result<Vec<ProductDto>, ApiError> {
    let products = state.db().products().low_stock().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Gets a single product by id.
pub async fn get_product(state: &AppState, id: &str) -> Result<ProductDto, ApiError> {
    let product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(ProductDto::from(product))
}

/// Creates a product.
///
/// Category and supplier default to the fallback rows when not given, the
/// same rows unresolvable remote references land on.
pub async fn create_product(
    state: &AppState,
    input: NewProductInput,
) -> Result<ProductDto, ApiError> {
    validate_name(&input.name)?;
    validate_price_cents(input.price_cents)?;
    validate_stock(input.current_stock)?;
    validate_min_stock(input.min_stock)?;
    if let Some(barcode) = &input.barcode {
        validate_barcode(barcode)?;
    }

    let category_id = input
        .category_id
        .unwrap_or_else(|| FALLBACK_CATEGORY_ID.to_string());
    let supplier_id = input
        .supplier_id
        .unwrap_or_else(|| FALLBACK_SUPPLIER_ID.to_string());

    let mut product = Product::new(
        input.name.trim(),
        input.price_cents,
        input.current_stock,
        input.min_stock,
        category_id,
        supplier_id,
    );
    product.barcode = input.barcode.filter(|b| !b.trim().is_empty());

    let repo = state.db().products();
    let to_insert = product.clone();
    state
        .executor()
        .submit(async move { repo.insert(&to_insert).await })
        .await??;
    info!(id = %product.id, name = %product.name, "Product created");

    Ok(ProductDto::from(product))
}

/// Edits a product. Only the fields present in the input change.
pub async fn update_product(
    state: &AppState,
    id: &str,
    input: UpdateProductInput,
) -> Result<ProductDto, ApiError> {
    let mut product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    if let Some(name) = input.name {
        validate_name(&name)?;
        product.name = name.trim().to_string();
    }
    if let Some(description) = input.description {
        product.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(price_cents) = input.price_cents {
        validate_price_cents(price_cents)?;
        product.price_cents = price_cents;
    }
    if let Some(min_stock) = input.min_stock {
        validate_min_stock(min_stock)?;
        product.min_stock = min_stock;
    }
    if let Some(barcode) = input.barcode {
        validate_barcode(&barcode)?;
        product.barcode = Some(barcode).filter(|b| !b.trim().is_empty());
    }

    let repo = state.db().products();
    let to_update = product.clone();
    state
        .executor()
        .submit(async move { repo.update(&to_update).await })
        .await??;
    info!(id = %product.id, "Product updated");

    get_product(state, id).await
}

/// Sets a product's stock to an absolute value.
///
/// Negative values are rejected before the database is touched.
pub async fn set_stock(state: &AppState, id: &str, stock: i64) -> Result<ProductDto, ApiError> {
    validate_stock(stock)?;

    let repo = state.db().products();
    let product_id = id.to_string();
    state
        .executor()
        .submit(async move { repo.set_stock(&product_id, stock).await })
        .await??;
    info!(id = %id, stock, "Stock updated");

    get_product(state, id).await
}

/// Soft-deletes a product.
pub async fn delete_product(state: &AppState, id: &str) -> Result<(), ApiError> {
    let repo = state.db().products();
    let product_id = id.to_string();
    state
        .executor()
        .submit(async move { repo.soft_delete(&product_id).await })
        .await??;
    info!(id = %id, "Product deleted");
    Ok(())
}
