//! Storage layer
//!
//! Two interchangeable `RecipeStore` backends: an embedded SQLite file and
//! an in-memory map.

pub mod db;
mod lock;
pub mod memory;

#[cfg(test)]
pub(crate) mod contract;

pub use db::Database;
pub use memory::MemoryStore;

use anyhow::{Context, Result};
use recipe_core::RecipeStore;
use std::sync::Arc;
use tracing::info;

use crate::config::{ServerConfig, StoreKind};

/// Build the configured backend
pub async fn open(config: &ServerConfig) -> Result<Arc<dyn RecipeStore>> {
    match config.store {
        StoreKind::Memory => {
            info!("Using in-memory recipe store (records are lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Db => {
            let db = Database::open(&config.db_path, config.db_timeout)
                .await
                .with_context(|| {
                    format!("Failed to open database at {}", config.db_path.display())
                })?;
            info!("Database initialized at: {}", db.path().display());
            Ok(Arc::new(db))
        }
    }
}
