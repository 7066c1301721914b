//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by an arbitrary string (usually client IP).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request for `key` and report whether it is allowed
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Process-local store. Counters are lost on restart, which is fine for
/// throttling challenge issuance.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitStore {
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop windows that ended before `now - window`
    pub async fn prune(&self, window: Duration) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| w.started.elapsed() < window);
        before - windows.len()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let mut windows = self.windows.lock().await;
        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            started: Instant::now(),
            count: 0,
        });

        if window.started.elapsed() >= config.window {
            window.started = Instant::now();
            window.count = 0;
        }

        if window.count >= config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
            };
        }

        window.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - window.count,
        }
    }
}
