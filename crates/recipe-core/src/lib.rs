//! Recipe Core Library
//!
//! The storage contract shared by every backend: error kinds and the
//! `RecipeStore` port trait.

// Re-export record types from recipe-types
pub use recipe_types::*;

pub mod error;
pub mod ports;

pub use error::{Result, StoreError};
pub use ports::RecipeStore;
