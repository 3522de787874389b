//! One-shot refresh command implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use calcached::config::{self, Config};
use calcached::refresher::Refresher;
use calcached::store::{FileSnapshotStore, SnapshotStore};
use calcached::upstream::HttpCalendarSource;

/// Fetch the dataset once, commit it, and exit.
pub async fn run(config_path: &str) -> Result<()> {
    let config = Config::load(config_path).await?;

    let cache_path = config::resolve_path(Path::new(config_path), &config.cache.path);
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&cache_path));

    let source = HttpCalendarSource::new(
        config.upstream.url.clone(),
        Duration::from_secs(config.upstream.timeout_seconds),
    )
    .context("Failed to build upstream client")?;

    let refresher = Refresher::new(Arc::new(source), store);
    refresher
        .refresh_today()
        .await
        .context("Refresh failed; previous snapshot left unchanged")?;

    println!("Calendar data refreshed to {}", cache_path.display());
    Ok(())
}
