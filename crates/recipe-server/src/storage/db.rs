//! SQLite-backed recipe store (embedded, single file)
//!
//! One table acts as the bucket: keys are raw recipe IDs, values are the
//! JSON encoding of the whole record.

use async_trait::async_trait;
use recipe_core::{Recipe, RecipeStore, Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::lock::FileLock;

/// How long a statement may wait for SQLite's writer lock or a pooled
/// connection. Long enough that operations never time out in practice.
const OPERATION_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
    lock: Mutex<Option<FileLock>>,
}

impl Database {
    /// Open (or create) the database at `path`.
    ///
    /// `timeout` bounds how long we wait for another process to release the
    /// file. Individual operations are not bounded by it.
    pub async fn open(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Opening recipe database at: {}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::BackendUnavailable(format!(
                    "failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let lock = FileLock::acquire(&FileLock::path_for(&path), timeout).await?;
        debug!("Holding {}", lock.path().display());

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(OPERATION_WAIT);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(OPERATION_WAIT)
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::BackendUnavailable(format!(
                    "could not open db {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Self::create_bucket(&pool).await?;
        info!("Recipes bucket created/verified");

        Ok(Self {
            pool,
            path,
            lock: Mutex::new(Some(lock)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn create_bucket(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY NOT NULL,
                value BLOB NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| {
            StoreError::BackendUnavailable(format!("could not create recipes bucket: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl RecipeStore for Database {
    async fn list(&self) -> Result<Vec<Recipe>> {
        debug!("Listing all recipes");

        let rows: Vec<(String, Vec<u8>)> = sqlx::query_as(
            r#"
            SELECT id, value FROM recipes ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let recipes = rows
            .into_iter()
            .map(|(id, value)| decode(&id, &value))
            .collect::<Result<Vec<_>>>()?;

        debug!("Found {} recipes", recipes.len());
        Ok(recipes)
    }

    async fn get(&self, id: &str) -> Result<Recipe> {
        debug!("Fetching recipe: {}", id);

        let row: Option<(Vec<u8>,)> = sqlx::query_as(
            r#"
            SELECT value FROM recipes WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            Some((value,)) => decode(id, &value),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn create(&self, recipe: &Recipe) -> Result<()> {
        debug!("Creating recipe: id={}, title={}", recipe.id, recipe.title);
        let value = serde_json::to_vec(recipe)?;

        // Existence check and insert happen in one implicit write transaction.
        let result = sqlx::query(
            r#"
            INSERT INTO recipes (id, value) VALUES (?1, ?2)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&recipe.id)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(recipe.id.clone()));
        }
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<()> {
        debug!("Updating recipe: {}", recipe.id);
        let value = serde_json::to_vec(recipe)?;

        let result = sqlx::query(
            r#"
            UPDATE recipes SET value = ?1 WHERE id = ?2
            "#,
        )
        .bind(value)
        .bind(&recipe.id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(recipe.id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        debug!("Deleting recipe: {}", id);

        let result = sqlx::query(
            r#"
            DELETE FROM recipes WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;

        if let Some(lock) = self.lock.lock().await.take() {
            lock.release()?;
            info!("Closed recipe database at: {}", self.path.display());
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "db"
    }
}

fn decode(id: &str, value: &[u8]) -> Result<Recipe> {
    serde_json::from_slice(value).map_err(|e| {
        StoreError::Serialization(format!("could not unmarshal recipe {}: {}", id, e))
    })
}

fn storage_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::BackendUnavailable(e.to_string())
        }
        other => StoreError::Storage(other.to_string()),
    }
}
