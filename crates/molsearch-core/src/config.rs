//! Centralized configuration for molsearch.
//!
//! This module provides configuration constants for pagination, the matching
//! engine, network operations and CSV export, plus the runtime-loadable
//! [`GatewayConfig`] describing where the compound registry lives.

use crate::error::{MolSearchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search and pagination configuration.
pub struct SearchConfig;

impl SearchConfig {
    pub const PAGE_SIZE: usize = 9;
    /// Maximum number of page buttons shown at once.
    pub const PAGE_WINDOW: usize = 5;
}

/// Matching engine configuration.
pub struct EngineConfig;

impl EngineConfig {
    /// How long a search waits for the engine before giving up for good.
    pub const READY_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const DEFAULT_API_BASE: &'static str = "http://localhost:8080/api";
    pub const USER_AGENT: &'static str = "molsearch/0.1";
    pub const API_BASE_ENV: &'static str = "MOLSEARCH_API_BASE";
    pub const API_TIMEOUT_ENV: &'static str = "MOLSEARCH_API_TIMEOUT_SECS";
}

/// CSV export configuration.
pub struct ExportConfig;

impl ExportConfig {
    pub const HEADER: [&'static str; 3] = ["regNumber", "variant", "smiles"];
    pub const MIME: &'static str = "text/csv;charset=utf-8";
    pub const BOM: char = '\u{feff}';
    /// `chrono` format string for the download file name.
    pub const FILE_NAME_FORMAT: &'static str = "%Y-%m-%d";
}

/// Location and client settings for the remote compound registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Base URL every endpoint is resolved against, e.g. `https://reg.example.org/api`.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: NetworkConfig::DEFAULT_API_BASE.to_string(),
            request_timeout_secs: NetworkConfig::REQUEST_TIMEOUT.as_secs(),
            user_agent: NetworkConfig::USER_AGENT.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create a config pointing at the given base URL with default client settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config document. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `MOLSEARCH_API_BASE` / `MOLSEARCH_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(base) = std::env::var(NetworkConfig::API_BASE_ENV) {
            config.base_url = base;
        }
        if let Ok(secs) = std::env::var(NetworkConfig::API_TIMEOUT_ENV) {
            config.request_timeout_secs =
                secs.trim().parse().map_err(|_| MolSearchError::Config {
                    message: format!(
                        "{} must be a whole number of seconds, got '{}'",
                        NetworkConfig::API_TIMEOUT_ENV,
                        secs
                    ),
                })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check that the base URL is absolute http(s) and the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| MolSearchError::Config {
            message: format!("Invalid gateway base URL '{}': {}", self.base_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MolSearchError::Config {
                message: format!("Unsupported gateway URL scheme: {}", url.scheme()),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(MolSearchError::Validation {
                field: "requestTimeoutSecs".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
