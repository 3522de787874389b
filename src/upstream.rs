//! Client for the upstream public calendar service.
//!
//! The service takes the local calendar date as a query parameter and returns
//! the day's dataset as JSON. The client enforces a request timeout so a hung
//! upstream is reported as a failed fetch instead of stalling a refresh.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::model::CacheSnapshot;

/// Maximum length of an upstream response body quoted in error messages.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Errors that can occur while fetching from the upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Upstream answered 2xx but the body did not parse as a calendar dataset.
    #[error("upstream payload did not parse: {0}")]
    InvalidPayload(String),
}

impl UpstreamError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        }
    }
}

/// Truncate a response body so error messages stay loggable.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
    format!("{}... ({} bytes total)", truncated, body.len())
}

/// A source of calendar datasets, keyed by local date.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the dataset for a `YYYY-MM-DD` date string.
    async fn fetch(&self, date: &str) -> Result<CacheSnapshot, UpstreamError>;
}

/// HTTP implementation of `CalendarSource`.
///
/// Clone is cheap: `reqwest::Client` shares its connection pool internally.
#[derive(Debug, Clone)]
pub struct HttpCalendarSource {
    client: Client,
    url: String,
}

impl HttpCalendarSource {
    /// Create a client for the given endpoint URL with a request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self, date: &str) -> Result<CacheSnapshot, UpstreamError> {
        debug!(url = %self.url, date = %date, "Requesting calendar dataset");

        let response = self
            .client
            .get(&self.url)
            .query(&[("today", date)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(status, &body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::InvalidPayload(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
