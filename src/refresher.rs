//! Refresh orchestration: fetch from upstream, commit to the store.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{SnapshotStore, StoreError};
use crate::upstream::{CalendarSource, UpstreamError};

/// Errors that can fail a refresh cycle.
///
/// A failed refresh is never fatal to the process; the previously committed
/// snapshot, if any, stays authoritative.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches the dataset for a date and replaces the stored snapshot.
///
/// Exactly one store write per successful run; zero writes per failed run.
/// There is no retry within a cycle; the next opportunity is the following
/// scheduled tick or a manual trigger.
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn CalendarSource>,
    store: Arc<dyn SnapshotStore>,
}

impl Refresher {
    pub fn new(source: Arc<dyn CalendarSource>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { source, store }
    }

    /// Refresh for the current local calendar date.
    pub async fn refresh_today(&self) -> Result<(), RefreshError> {
        self.refresh_for(Local::now().date_naive()).await
    }

    /// Refresh for a specific date.
    pub async fn refresh_for(&self, date: NaiveDate) -> Result<(), RefreshError> {
        let date_param = date.format("%Y-%m-%d").to_string();
        debug!(date = %date_param, "Starting refresh");

        let snapshot = self.source.fetch(&date_param).await?;
        self.store.write(&snapshot).await?;

        info!(
            date = %date_param,
            results = snapshot.results.len(),
            "Snapshot refreshed"
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::model::CacheSnapshot;
    use crate::store::FileSnapshotStore;

    fn sample_snapshot() -> CacheSnapshot {
        serde_json::from_value(json!({
            "lastUpdated": "2024-06-01T06:00:00Z",
            "results": [
                {
                    "CalendarName": "Schools",
                    "WeekDayRecordName": "OPEN",
                    "WeekDayContentFormat": "Public schools are open."
                }
            ]
        }))
        .unwrap()
    }

    struct FixedSource(CacheSnapshot);

    #[async_trait]
    impl CalendarSource for FixedSource {
        async fn fetch(&self, _date: &str) -> Result<CacheSnapshot, UpstreamError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CalendarSource for FailingSource {
        async fn fetch(&self, _date: &str) -> Result<CacheSnapshot, UpstreamError> {
            Err(UpstreamError::Status {
                status: 500,
                body: "upstream exploded".to_string(),
            })
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn successful_refresh_commits_fetched_payload() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileSnapshotStore::new(temp_dir.path().join("cache.json")));
        let expected = sample_snapshot();
        let refresher = Refresher::new(Arc::new(FixedSource(expected.clone())), store.clone());

        refresher.refresh_for(test_date()).await.unwrap();

        assert_eq!(store.read().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_previous_snapshot_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        let store = Arc::new(FileSnapshotStore::new(&path));
        store.write(&sample_snapshot()).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let refresher = Refresher::new(Arc::new(FailingSource), store.clone());
        let result = refresher.refresh_for(test_date()).await;

        assert!(matches!(result, Err(RefreshError::Upstream(_))));
        // Byte-for-byte unchanged, not merely equal after a re-parse.
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn failed_fetch_on_empty_store_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        let store = Arc::new(FileSnapshotStore::new(&path));

        let refresher = Refresher::new(Arc::new(FailingSource), store.clone());
        assert!(refresher.refresh_for(test_date()).await.is_err());

        assert!(!path.exists());
        assert!(matches!(
            store.read().await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
