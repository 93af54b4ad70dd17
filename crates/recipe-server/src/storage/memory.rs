//! In-memory recipe store (process lifetime only)

use async_trait::async_trait;
use recipe_core::{Recipe, RecipeStore, Result, StoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Map-backed store guarded by a single reader/writer lock.
///
/// Reads share the lock; every mutation does its existence check and write
/// under one exclusive guard.
pub struct MemoryStore {
    recipes: RwLock<HashMap<String, Recipe>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            recipes: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        let mut all: Vec<Recipe> = recipes.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Recipe> {
        self.recipes
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, recipe: &Recipe) -> Result<()> {
        ensure_encodable(recipe)?;
        let mut recipes = self.recipes.write().await;
        if recipes.contains_key(&recipe.id) {
            return Err(StoreError::AlreadyExists(recipe.id.clone()));
        }
        recipes.insert(recipe.id.clone(), recipe.clone());
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<()> {
        ensure_encodable(recipe)?;
        let mut recipes = self.recipes.write().await;
        match recipes.get_mut(&recipe.id) {
            Some(existing) => {
                *existing = recipe.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(recipe.id.clone())),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.recipes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Refuse records the file backend could not store either
fn ensure_encodable(recipe: &Recipe) -> Result<()> {
    serde_json::to_writer(std::io::sink(), recipe)?;
    Ok(())
}
