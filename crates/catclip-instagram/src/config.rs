//! Graph API configuration.

use std::time::Duration;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.instagram.com";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v18.0";

#[derive(Debug, Clone)]
pub struct InstagramConfig {
    /// Graph API host
    pub base_url: String,
    /// Graph API version path segment
    pub api_version: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl InstagramConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("INSTAGRAM_BASE_URL").unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.to_string()),
            api_version: std::env::var("INSTAGRAM_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_GRAPH_API_VERSION.to_string()),
            timeout: Duration::from_secs(
                std::env::var("INSTAGRAM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Versioned URL for a Graph API node or edge.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
