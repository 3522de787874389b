//! Common test utilities.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use tempfile::TempDir;

use calcached::model::CacheSnapshot;
use calcached::refresher::Refresher;
use calcached::server::{self, AppState};
use calcached::store::{FileSnapshotStore, SnapshotStore};
use calcached::upstream::{CalendarSource, UpstreamError};

/// The origin configured into every test app.
pub const ALLOWED_ORIGIN: &str = "http://127.0.0.1:41416";

/// Source that always returns a fixed snapshot.
pub struct FixedSource(pub CacheSnapshot);

#[async_trait]
impl CalendarSource for FixedSource {
    async fn fetch(&self, _date: &str) -> Result<CacheSnapshot, UpstreamError> {
        Ok(self.0.clone())
    }
}

/// Source that always fails with an upstream server error.
pub struct FailingSource;

#[async_trait]
impl CalendarSource for FailingSource {
    async fn fetch(&self, _date: &str) -> Result<CacheSnapshot, UpstreamError> {
        Err(UpstreamError::Status {
            status: 500,
            body: "upstream exploded".to_string(),
        })
    }
}

pub fn sample_snapshot() -> CacheSnapshot {
    serde_json::from_value(json!({
        "lastUpdated": "2024-06-01T06:00:00Z",
        "results": [
            {
                "CalendarName": "Alternate Side Parking",
                "WeekDayRecordName": "IN EFFECT",
                "WeekDayContentFormat": "Alternate side parking is in effect.",
                "SaturdayRecordName": "NOT IN EFFECT",
                "SaturdayContentFormat": "Rules suspended on Saturday."
            },
            {
                "CalendarName": "Collections",
                "WeekDayRecordName": "ON SCHEDULE",
                "WeekDayContentFormat": "Trash and recycling on schedule."
            }
        ]
    }))
    .unwrap()
}

/// Build a test app over a fresh temp-dir store and the given source.
///
/// Returns the router, the store (for seeding or inspecting state), and the
/// temp dir guard keeping the store's directory alive.
pub fn test_app(source: Arc<dyn CalendarSource>) -> (Router, Arc<dyn SnapshotStore>, TempDir) {
    let tmp = TempDir::new().unwrap();
    let store: Arc<dyn SnapshotStore> =
        Arc::new(FileSnapshotStore::new(tmp.path().join("cache.json")));

    let refresher = Refresher::new(source, store.clone());
    let state = AppState {
        store: store.clone(),
        refresher,
        allowed_origin: ALLOWED_ORIGIN.to_string(),
    };

    (server::build_app(state, Duration::from_secs(5)), store, tmp)
}
