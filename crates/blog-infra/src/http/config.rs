use std::env;
use std::time::Duration;

use blog_core::ApiError;

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Backend origin, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RestClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("BLOG_API_URL").unwrap_or(defaults.base_url),
            timeout: env::var("BLOG_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Build the HTTP client shared by every entity API.
    pub fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}
