//! Core data models for the product catalog.
//!
//! Records map to SQLite rows via `sqlx::FromRow` and serialize as the JSON
//! shapes the storefront consumes.

pub mod object_id;
pub mod product;
pub mod session;
