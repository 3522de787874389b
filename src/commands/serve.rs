//! HTTP server command implementation.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use calcached::config::{self, Config};
use calcached::refresher::Refresher;
use calcached::scheduler::Scheduler;
use calcached::server::{self, AppState};
use calcached::store::{FileSnapshotStore, SnapshotStore};
use calcached::upstream::HttpCalendarSource;

pub async fn run(
    config_path: &str,
    host_override: Option<IpAddr>,
    port_override: Option<u16>,
) -> Result<()> {
    let mut config = Config::load(config_path).await?;

    // CLI overrides config
    if let Some(host) = host_override {
        config.server.host = host.to_string();
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let cache_path = config::resolve_path(Path::new(config_path), &config.cache.path);
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&cache_path));
    info!(path = %cache_path.display(), "Snapshot store initialized");

    let source = HttpCalendarSource::new(
        config.upstream.url.clone(),
        Duration::from_secs(config.upstream.timeout_seconds),
    )
    .context("Failed to build upstream client")?;
    let refresher = Refresher::new(Arc::new(source), store.clone());

    // Warms the cache immediately, then refreshes daily at local midnight.
    let scheduler = Scheduler::new(refresher.clone()).spawn();

    let state = AppState {
        store,
        refresher,
        allowed_origin: config.cors.allowed_origin.clone(),
    };
    let app = server::build_app(
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let ip: IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, origin = %config.cors.allowed_origin, "Starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
