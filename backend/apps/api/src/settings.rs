//! Environment Settings

use anyhow::Context;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "http://backend:8080";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_STATIC_CONFIG: &str = "public/config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: Url,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub static_config: PathBuf,
    pub proxy_timeout: Duration,
    pub proxy_max_body_bytes: usize,
    pub admin_challenge_ttl: Duration,
    /// Peers allowed to name the client through forwarding headers
    pub trusted_proxies: Vec<IpAddr>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank variables take defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = var("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let backend_url = Url::parse(backend_url.trim())
            .with_context(|| format!("BACKEND_URL is not a valid URL: {backend_url}"))?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let trusted_proxies = var("TRUSTED_PROXIES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(|ip| {
                ip.parse::<IpAddr>()
                    .with_context(|| format!("TRUSTED_PROXIES has an invalid address: {ip}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            backend_url,
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT)?,
            frontend_origins,
            static_config: var("HUB_STATIC_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_CONFIG)),
            proxy_timeout: Duration::from_secs(parse_or(
                var("PROXY_TIMEOUT_SECS"),
                "PROXY_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            proxy_max_body_bytes: parse_or(
                var("PROXY_MAX_BODY_BYTES"),
                "PROXY_MAX_BODY_BYTES",
                DEFAULT_MAX_BODY_BYTES,
            )?,
            admin_challenge_ttl: Duration::from_secs(parse_or(
                var("ADMIN_CHALLENGE_TTL_SECS"),
                "ADMIN_CHALLENGE_TTL_SECS",
                DEFAULT_CHALLENGE_TTL_SECS,
            )?),
            trusted_proxies,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
