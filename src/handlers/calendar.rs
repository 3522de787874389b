//! Calendar cache endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::handlers::error;
use crate::refresher::RefreshError;
use crate::server::AppState;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct RefreshedResponse {
    pub message: String,
}

/// GET /cached-data
///
/// Serves the most recently committed snapshot. Read failures surface as
/// structured errors, never as an empty or default payload.
pub async fn cached_data(State(state): State<AppState>) -> Response {
    match state.store.read().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(StoreError::NotFound { .. }) => {
            error::not_found("no calendar data has been fetched yet")
        }
        Err(e @ StoreError::Corrupt { .. }) => {
            error!(error = %e, "Snapshot file is unreadable");
            error::internal_error("cached calendar data is unreadable")
        }
        Err(e) => {
            error!(error = %e, "Failed to read snapshot");
            error::internal_error("failed to read cached calendar data")
        }
    }
}

/// POST /manual-refresh
///
/// Runs a refresh synchronously and reports the true outcome; a failure here
/// leaves the previous snapshot in place.
pub async fn manual_refresh(State(state): State<AppState>) -> Response {
    match state.refresher.refresh_today().await {
        Ok(()) => (
            StatusCode::OK,
            Json(RefreshedResponse {
                message: "calendar data updated".to_string(),
            }),
        )
            .into_response(),
        Err(RefreshError::Upstream(e)) => {
            warn!(error = %e, "Manual refresh failed to fetch");
            error::bad_gateway(format!("failed to fetch calendar data: {e}"))
        }
        Err(RefreshError::Store(e)) => {
            error!(error = %e, "Manual refresh failed to persist");
            error::internal_error(format!("failed to store calendar data: {e}"))
        }
    }
}
