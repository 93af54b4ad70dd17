//! Exclusive advisory lock held next to the database file
//!
//! Only one process may have a given database open. The lock is taken with
//! `flock(LOCK_EX)` (or `LockFileEx` on Windows) on `<db path>.lock` and
//! held until the store is closed or dropped.

use fs2::FileExt;
use recipe_core::{Result, StoreError};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Lock file path for a database path
    pub fn path_for(db_path: &Path) -> PathBuf {
        let mut name = db_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Acquire the lock, retrying until `timeout` has elapsed
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                StoreError::BackendUnavailable(format!(
                    "failed to open lock file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    debug!("Acquired database lock at {}", path.display());
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if is_contended(&e) && started.elapsed() < timeout => {
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
                Err(e) if is_contended(&e) => {
                    return Err(StoreError::BackendUnavailable(format!(
                        "database is locked by another process ({}) after {:?}",
                        path.display(),
                        timeout
                    )));
                }
                Err(e) => {
                    return Err(StoreError::BackendUnavailable(format!(
                        "failed to lock {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly. Dropping the lock also releases it.
    pub fn release(self) -> Result<()> {
        self.file.unlock().map_err(|e| {
            StoreError::Storage(format!("failed to unlock {}: {}", self.path.display(), e))
        })?;
        debug!("Released database lock at {}", self.path.display());
        Ok(())
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
