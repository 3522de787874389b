//! HTTP server assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::warn;

use crate::handlers;
use crate::refresher::Refresher;
use crate::store::SnapshotStore;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SnapshotStore>,
    pub refresher: Refresher,
    /// The single origin allowed to call the data endpoints.
    pub allowed_origin: String,
}

// ============================================================================
// Server Setup
// ============================================================================

pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let cors = cors_layer(&state.allowed_origin);

    // Data endpoints sit behind the origin gate; probes do not.
    let api_routes = Router::new()
        .route("/cached-data", get(handlers::cached_data))
        .route("/manual-refresh", post(handlers::manual_refresh))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_allowed_origin,
        ))
        .layer(cors)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .with_state(state)
        .merge(api_routes)
}

/// CORS layer scoped to the single configured origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(origin = %origin, "Configured origin is not a valid header value; CORS headers disabled");
            layer
        }
    }
}
