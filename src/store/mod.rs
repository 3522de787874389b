//! Snapshot persistence.

mod error;
mod file;

pub use error::{StoreError, StoreResult};
pub use file::FileSnapshotStore;

use async_trait::async_trait;

use crate::model::CacheSnapshot;

/// Storage for the single cached calendar snapshot.
///
/// A store holds at most one snapshot at a time. `write` replaces it
/// atomically with respect to concurrent readers; `read` returns the most
/// recently committed snapshot or fails if none was ever committed.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the current snapshot.
    async fn read(&self) -> StoreResult<CacheSnapshot>;

    /// Replace the stored snapshot.
    async fn write(&self, snapshot: &CacheSnapshot) -> StoreResult<()>;
}
