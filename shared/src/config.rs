//! Configuration for the HomieFixie client.

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use crate::{Error, Result};

/// Backend used when `HOMIEFIXIE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_url: String,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Emit JSON log lines instead of the human format
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("HOMIEFIXIE_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let http_timeout = match env::var("HOMIEFIXIE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    Error::Config(format!("HOMIEFIXIE_HTTP_TIMEOUT_SECS is not a number: {}", raw))
                })?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_json = env::var("HOMIEFIXIE_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self::default()
            .with_api_url(api_url)
            .with_timeout(http_timeout)
            .with_log_json(log_json))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }

    /// Absolute URL for an API path such as `/api/analyze`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Process-wide configuration. Falls back to defaults if `init` was never called.
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Config::default)
    }
}

/// Install the process-wide configuration.
///
/// Only the first call wins; later calls return a config error.
pub fn init(config: Config) -> Result<&'static Config> {
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("configuration already initialized".to_string()))?;
    Ok(Config::global())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = Config::default().with_api_url("https://api.homiefixie.com/");
        assert_eq!(config.api_url, "https://api.homiefixie.com");
        assert_eq!(
            config.endpoint("/api/analyze"),
            "https://api.homiefixie.com/api/analyze"
        );
    }

    #[test]
    fn test_default_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.endpoint("/api/tickets"), "http://localhost:4000/api/tickets");
        assert!(!config.log_json);
    }
}
