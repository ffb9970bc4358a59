//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_STATE_FILE: &str = ".cms-admin/state.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API origin is not an `http(s)` URL.
    #[error("invalid API URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL including the `/api` prefix, without a trailing slash.
    pub api_url: String,
    /// File backing the durable key-value storage.
    pub state_file: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CMS_API_URL`: backend origin; `/api` is appended (default `http://127.0.0.1:8080/api`)
    /// - `CMS_STATE_FILE`: storage file path (default `.cms-admin/state.json`)
    /// - `CMS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CMS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `CMS_API_URL` is set but is not an HTTP URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = resolve_api_url(non_empty_env("CMS_API_URL").as_deref())?;
        let state_file = non_empty_env("CMS_STATE_FILE").map_or_else(|| PathBuf::from(DEFAULT_STATE_FILE), PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("CMS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CMS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, state_file, timeouts })
    }
}

/// Turn a backend origin into the API base URL.
///
/// # Errors
///
/// Returns `InvalidApiUrl` for anything other than an `http(s)` origin.
pub fn resolve_api_url(origin: Option<&str>) -> Result<String, ConfigError> {
    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return Ok(DEFAULT_API_URL.to_owned());
    };
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(origin.to_owned()));
    }
    Ok(format!("{}/api", origin.trim_end_matches('/')))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
