//! Daily refresh scheduling.
//!
//! A single process-wide timer task warms the cache once at startup and then
//! refreshes once per calendar day at local midnight. The next fire time is
//! recomputed from the wall clock on every iteration, so drift never
//! accumulates across long uptimes or restarts.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::refresher::Refresher;

/// Daily at 00:00:00 local time (sec min hour day-of-month month day-of-week year).
const DAILY_REFRESH_CRON: &str = "0 0 0 * * * *";

/// Sleep applied when the next fire time cannot be computed.
const FALLBACK_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Owns the refresh timer for the lifetime of the process.
pub struct Scheduler {
    refresher: Refresher,
}

/// Handle for shutting the scheduler down.
pub struct SchedulerHandle {
    shutdown_tx: oneshot::Sender<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler. Any in-flight refresh runs to completion.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Scheduler {
    pub fn new(refresher: Refresher) -> Self {
        Self { refresher }
    }

    /// Start the timer task.
    ///
    /// Returns a handle for graceful shutdown.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown_tx }
    }

    async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) {
        info!("Scheduler started");

        // Eager warm so clients are not waiting on the first midnight tick.
        if let Err(e) = self.refresher.refresh_today().await {
            warn!(error = %e, "Startup refresh failed; serving any previous snapshot");
        }

        loop {
            let delay = match next_fire(Local::now()) {
                Some(at) => {
                    info!(next_run = %at, "Scheduled next refresh");
                    at.signed_duration_since(Local::now())
                        .to_std()
                        .unwrap_or(Duration::ZERO)
                }
                None => {
                    error!("Could not compute next refresh time");
                    FALLBACK_DELAY
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    info!("Running scheduled refresh");
                    if let Err(e) = self.refresher.refresh_today().await {
                        warn!(error = %e, "Scheduled refresh failed; keeping previous snapshot");
                    }
                }
                _ = &mut shutdown_rx => {
                    info!("Scheduler shutting down");
                    break;
                }
            }
        }
    }
}

/// The next local-midnight fire time strictly after `after`.
fn next_fire(after: DateTime<Local>) -> Option<DateTime<Local>> {
    let schedule = cron::Schedule::from_str(DAILY_REFRESH_CRON).ok()?;
    schedule.after(&after).next()
}

// ============================================================================
// Tests
// ============================================================================
