//! # bodega-core: Pure Domain Logic for Bodega
//!
//! This crate is the **heart** of Bodega. It contains all domain logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bodega Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console App (apps/console)                   │   │
//! │  │    Product list ──► Search ──► Low-stock alert ──► Forms        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐                │   │
//! │  │   │   types   │  │   money   │  │  validation │                │   │
//! │  │   │  Product  │  │   Money   │  │    rules    │                │   │
//! │  │   │  Category │  │           │  │   checks    │                │   │
//! │  │   │  Supplier │  │           │  │             │                │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         bodega-db (SQLite)        bodega-sync (doc store)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Supplier)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bodega_core::Money` instead of
// `use bodega_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category that products with an unresolvable category reference land on.
///
/// ## Why a constant?
/// Remote documents carry loosely-typed category references. When a reference
/// cannot be resolved against synced categories, the product is assigned to
/// this fixed row instead of being rejected. The row itself is seeded by the
/// initial migration.
pub const FALLBACK_CATEGORY_ID: &str = "00000000-0000-0000-0000-0000000000c1";

/// Supplier that products with an unresolvable supplier reference land on.
///
/// Seeded by the initial migration, same rationale as [`FALLBACK_CATEGORY_ID`].
pub const FALLBACK_SUPPLIER_ID: &str = "00000000-0000-0000-0000-0000000000d1";

/// Maximum length for entity names (products, categories, suppliers).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a search query.
pub const MAX_QUERY_LENGTH: usize = 100;
