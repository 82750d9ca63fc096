//! Configuration module for the stylesheet pipeline
//!
//! Provides option types, defaults and merging, and `styles.toml` loading.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
