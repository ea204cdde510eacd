//! HTTP client for the compound registry.
//!
//! Provides a wrapper around reqwest with:
//! - Configurable timeouts and user agent
//! - JSON response decoding
//! - Non-2xx responses mapped to `Network` errors, using the registry's
//!   `message` field when the body carries one

use crate::config::GatewayConfig;
use crate::error::{MolSearchError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client bound to the registry's base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: url::Url,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client from gateway settings.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        // A trailing slash makes Url::join append instead of replacing the last segment.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = url::Url::parse(&base).map_err(|e| MolSearchError::Config {
            message: format!("Invalid gateway base URL '{}': {}", config.base_url, e),
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| MolSearchError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self {
            client,
            base_url,
            timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a relative endpoint path and append query parameters.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<url::Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| MolSearchError::Config {
                message: format!("Invalid endpoint path '{}': {}", path, e),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET an endpoint and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: url::Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let response = Self::check_response_status(response, url.as_str()).await?;
        response.json::<T>().await.map_err(|e| MolSearchError::Json {
            message: format!("Failed to decode response from {}: {}", url, e),
            source: None,
        })
    }

    fn transport_error(&self, url: &url::Url, err: reqwest::Error) -> MolSearchError {
        if err.is_timeout() {
            warn!("GET {} timed out after {:?}", url, self.timeout);
            MolSearchError::Timeout(self.timeout)
        } else {
            MolSearchError::Network {
                message: format!("No response received from {}: {}", extract_domain(url.as_str()), err),
                status: None,
            }
        }
    }

    async fn check_response_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body).unwrap_or_else(|| describe_status(status));
        warn!("GET {} failed with {}: {}", url, status, message);

        Err(MolSearchError::Network {
            message,
            status: Some(status.as_u16()),
        })
    }
}

/// The `message` field of a JSON error body, if present.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Server error occurred ({} {})", status.as_u16(), reason),
        None => format!("Server error occurred ({})", status.as_u16()),
    }
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(&GatewayConfig::new(base)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://reg.example.org/api");
        let url = client.endpoint("/compounds/R-1", &[]).unwrap();
        assert_eq!(url.as_str(), "https://reg.example.org/api/compounds/R-1");
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let client = client("https://reg.example.org/api/");
        let url = client
            .endpoint("search/substructure", &[("smiles", "C(=O)[O-]#1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://reg.example.org/api/search/substructure?smiles=C%28%3DO%29%5BO-%5D%231"
        );
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message": "Compound not found"}"#).as_deref(),
            Some("Compound not found")
        );
        assert_eq!(server_message(r#"{"message": ""}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }

    #[test]
    fn test_describe_status() {
        assert_eq!(
            describe_status(StatusCode::NOT_FOUND),
            "Server error occurred (404 Not Found)"
        );
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://reg.example.org/api"), "reg.example.org");
        assert_eq!(extract_domain("invalid-url"), "unknown");
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(HttpClient::new(&GatewayConfig::new("reg.example.org")).is_err());
    }
}
