//! Application Configuration

use std::time::Duration;
use url::Url;

/// Default backend inside the compose network
pub const DEFAULT_BACKEND_URL: &str = "http://backend:8080";

/// Proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Backend base URL; proxied paths are appended to it
    pub backend_url: Url,
    /// Outbound request timeout
    pub timeout: Duration,
    /// Largest inbound body forwarded (app submissions carry images)
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            timeout: Duration::from_secs(30),
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}

impl ProxyConfig {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
