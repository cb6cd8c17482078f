//! # Sync Commands
//!
//! Triggers a pull from the remote document store into the local cache.

use serde::Serialize;
use tracing::{info, warn};

use bodega_sync::SyncSummary;

use crate::error::ApiError;
use crate::state::AppState;

/// Sync outcome DTO.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub categories: usize,
    pub suppliers: usize,
    pub products: usize,
    pub total: usize,
    pub clean: bool,
    pub errors: Vec<String>,
}

impl From<SyncSummary> for SyncReport {
    fn from(summary: SyncSummary) -> Self {
        SyncReport {
            categories: summary.categories,
            suppliers: summary.suppliers,
            products: summary.products,
            total: summary.total(),
            clean: summary.is_clean(),
            errors: summary.errors,
        }
    }
}

/// Pulls all three collections from the remote store.
pub async fn sync_all(state: &AppState) -> Result<SyncReport, ApiError> {
    info!("Starting full sync");
    let summary = state.sync().sync_all().await;

    if !summary.is_clean() {
        warn!(errors = summary.errors.len(), "Sync finished with errors");
    }
    Ok(SyncReport::from(summary))
}

/// Pulls only the products collection, resolving references against the
/// categories and suppliers already cached locally.
pub async fn sync_products(state: &AppState) -> Result<SyncReport, ApiError> {
    info!("Starting product sync");
    let summary = state.sync().sync_products().await;

    if !summary.is_clean() {
        warn!(errors = summary.errors.len(), "Sync finished with errors");
    }
    Ok(SyncReport::from(summary))
}
