//! Application configuration loaded from environment variables.

#[cfg(feature = "http")]
use blog_infra::RestClientConfig;

use crate::cli::BackendKind;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    #[cfg(feature = "http")]
    pub rest: RestClientConfig,
}

impl AppConfig {
    /// Combine the selected backend with the `BLOG_API_URL` /
    /// `BLOG_HTTP_TIMEOUT_SECS` environment.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            #[cfg(feature = "http")]
            rest: RestClientConfig::from_env(),
        }
    }
}
