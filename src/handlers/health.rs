use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::server::AppState;

pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[derive(Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    /// Whether a readable snapshot is on disk.
    pub cache_primed: bool,
}

pub async fn readyz(State(state): State<AppState>) -> Json<ReadyzResponse> {
    let cache_primed = state.store.read().await.is_ok();
    Json(ReadyzResponse {
        status: "ok".to_string(),
        cache_primed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_livez() {
        let (status, body) = livez().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
