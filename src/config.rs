//! Daemon configuration.
//!
//! Loaded from a YAML file; every key is optional and falls back to a
//! default. CLI flags override the file where the command supports them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults; an unreadable or unparseable file
    /// is an error.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }
}

/// Resolve a path relative to the config file directory.
///
/// Absolute paths are returned as-is. Relative paths are joined with the
/// config file's parent directory, so behavior does not depend on the current
/// working directory.
pub fn resolve_path(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    config_dir.join(path)
}

// ============================================================================
// Private Helpers (Serde Defaults)
// ============================================================================

fn default_host() -> String {
    // Local display clients only; never exposed beyond the machine.
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upstream_url() -> String {
    "https://portal.311.nyc.gov/home-cal/".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("calendar-cache.json")
}

fn default_allowed_origin() -> String {
    "http://127.0.0.1:41416".to_string()
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

// ============================================================================
// UpstreamConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpstreamConfig {
    /// Endpoint of the calendar service; the date is appended as `?today=`.
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

// ============================================================================
// CacheConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Snapshot file path. Relative paths resolve against the config file
    /// directory.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

// ============================================================================
// CorsConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CorsConfig {
    /// The single origin allowed to call the data endpoints.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
