//! Console configuration

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the catalog service base URL.
pub const BASE_URL_ENV: &str = "CATALOG_API_URL";
/// Environment variable holding the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "CATALOG_API_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Settings for reaching the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Service base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ConsoleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Reads [`BASE_URL_ENV`] and [`TIMEOUT_ENV`], falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let seconds = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                var: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(seconds));
        }
        Ok(config)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
