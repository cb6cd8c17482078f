//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Repository Pattern
//! Each repository owns the SQL for one entity and exposes typed async
//! methods. Repositories hold a cloned `SqlitePool` handle, so they are
//! cheap to create per call (`db.products().list_active().await?`).

pub mod category;
pub mod product;
pub mod supplier;
