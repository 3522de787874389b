//! File-based snapshot storage implementation.
//!
//! The snapshot lives in a single JSON file. Writes go to a temp file in the
//! same directory followed by an atomic rename, so a concurrent reader sees
//! either the previous snapshot or the new one, never a torn file.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::model::CacheSnapshot;
use crate::store::error::{StoreError, StoreResult};
use crate::store::SnapshotStore;

/// File-backed implementation of `SnapshotStore`.
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    // Serializes writers so two overlapping refreshes cannot interleave on the
    // temp file. Readers never take this lock.
    write_lock: Mutex<()>,
}

impl FileSnapshotStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn read(&self) -> StoreResult<CacheSnapshot> {
        let contents = match fs::read(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found(&self.path));
            }
            Err(e) => return Err(StoreError::file_io(&self.path, e)),
        };

        serde_json::from_slice(&contents).map_err(|e| StoreError::corrupt(&self.path, e.to_string()))
    }

    async fn write(&self, snapshot: &CacheSnapshot) -> StoreResult<()> {
        let contents = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::serialize(e.to_string()))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::file_io(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &contents)
            .await
            .map_err(|e| StoreError::file_io(&temp_path, e))?;

        // Atomic rename
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::file_io(&self.path, e))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
