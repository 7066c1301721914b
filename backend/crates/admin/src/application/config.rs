//! Application Configuration

use platform::rate_limit::RateLimitConfig;
use std::net::IpAddr;
use std::time::Duration;

/// Admin gate configuration
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Challenge lifetime
    pub challenge_ttl: Duration,
    /// Random nonce length in bytes
    pub nonce_len: usize,
    /// Challenge issuance limit per client IP
    pub rate_limit: RateLimitConfig,
    /// Reverse proxies whose forwarding headers name the client
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            challenge_ttl: Duration::from_secs(300),
            nonce_len: 16,
            rate_limit: RateLimitConfig::default(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl AdminConfig {
    pub fn with_challenge_ttl(mut self, ttl: Duration) -> Self {
        self.challenge_ttl = ttl;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_trusted_proxies(mut self, proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        self.trusted_proxies = proxies.into_iter().collect();
        self
    }

    pub fn challenge_ttl_ms(&self) -> i64 {
        self.challenge_ttl.as_millis() as i64
    }
}
