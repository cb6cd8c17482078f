//! # Console Commands
//!
//! Command functions behind the interactive prompt. Each command takes the
//! shared state, validates its input, and returns a DTO or an [`ApiError`].
//!
//! [`ApiError`]: crate::error::ApiError

pub mod catalog;
pub mod product;
pub mod sync;
