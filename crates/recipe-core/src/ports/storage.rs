//! Storage trait for recipe persistence

use crate::Result;
use async_trait::async_trait;
use recipe_types::Recipe;

/// Recipe store
///
/// Every backend keeps one complete record per ID. Callers assign IDs and
/// validate fields before calling `create`/`update`; the store only enforces
/// uniqueness and existence.
///
/// - `create` fails with `StoreError::AlreadyExists` if the ID is present.
/// - `get`, `update` and `delete` fail with `StoreError::NotFound` if it is absent.
/// - `update` replaces the whole record.
/// - `list` returns a snapshot of every record, sorted by ID. An empty store
///   yields an empty vector.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Recipe>>;
    async fn get(&self, id: &str) -> Result<Recipe>;
    async fn create(&self, recipe: &Recipe) -> Result<()>;
    async fn update(&self, recipe: &Recipe) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;

    /// Flush and release any held resources. Call once during shutdown.
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name, used in logs and health output
    fn backend(&self) -> &'static str;
}
