use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Backend base URL, without a trailing slash
    pub api_url: String,
    /// Per-request timeout; `None` leaves requests bounded only by the transport
    pub request_timeout_secs: Option<u64>,
    pub health_timeout_secs: u64,
    /// Shown in the offline banner; derived from `api_url` when unset
    pub start_hint: Option<String>,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SUPER_ADMIN_API_URL") {
            match normalize_api_url(&v) {
                Ok(url) => self.api_url = url,
                Err(e) => tracing::warn!("Ignoring SUPER_ADMIN_API_URL: {}", e),
            }
        }
        if let Some(v) = lookup("SUPER_ADMIN_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v.parse().ok().filter(|secs| *secs > 0);
        }
        if let Some(v) = lookup("SUPER_ADMIN_HEALTH_TIMEOUT_SECS") {
            // A zero timeout would expire before any backend could answer
            match v.parse::<u64>().ok().filter(|secs| *secs > 0) {
                Some(secs) => self.health_timeout_secs = secs,
                None => tracing::warn!(
                    "Ignoring SUPER_ADMIN_HEALTH_TIMEOUT_SECS={:?}; using {}s",
                    v,
                    self.health_timeout_secs
                ),
            }
        }
        if let Some(v) = lookup("SUPER_ADMIN_START_HINT") {
            if !v.trim().is_empty() {
                self.start_hint = Some(v);
            }
        }

        self
    }

    /// Replace the backend address, e.g. from a `--api-url` flag
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(url)?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn start_hint(&self) -> String {
        match &self.start_hint {
            Some(hint) => hint.clone(),
            None => format!(
                "Please start the backend server so that it listens on {}",
                self.api_url
            ),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: None,
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            start_hint: None,
        }
    }
}

/// Validate a base URL and strip any trailing slash so paths can be appended
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ConsoleConfig> = Lazy::new(ConsoleConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ConsoleConfig {
    &CONFIG
}
