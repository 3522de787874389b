//! Structured JSON error responses.
//!
//! Every error leaving the HTTP surface is `{ "error": "..." }` with a
//! non-2xx status, so clients can always distinguish a failure from a valid
//! (possibly empty-looking) payload.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn not_found(message: impl Into<String>) -> Response {
    respond(StatusCode::NOT_FOUND, message)
}

pub fn forbidden(message: impl Into<String>) -> Response {
    respond(StatusCode::FORBIDDEN, message)
}

pub fn bad_gateway(message: impl Into<String>) -> Response {
    respond(StatusCode::BAD_GATEWAY, message)
}

pub fn internal_error(message: impl Into<String>) -> Response {
    respond(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn respond(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}
