//! Single-origin access gate.
//!
//! The daemon serves exactly one configured widget origin. Any request whose
//! `Origin` header names a different origin is rejected before handler logic
//! runs. Requests without an `Origin` header (same-host tools, curl) pass
//! through; they are not cross-origin.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::handlers::error;
use crate::server::AppState;

pub async fn require_allowed_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if origin.as_bytes() != state.allowed_origin.as_bytes() => {
            warn!(origin = ?origin, "Rejected request from unconfigured origin");
            error::forbidden("origin not allowed")
        }
        _ => next.run(request).await,
    }
}
