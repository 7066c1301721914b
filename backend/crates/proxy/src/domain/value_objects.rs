//! Domain Value Objects

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName};
use kernel::id::AppId;

use crate::error::{ProxyError, ProxyResult};

/// Message signature for write operations
pub const X_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");
/// Admin identity
pub const WALLET_ADDRESS: HeaderName = HeaderName::from_static("wallet-address");

/// The only inbound headers that reach the backend
pub const FORWARDED_HEADERS: [HeaderName; 5] =
    [CONTENT_TYPE, ACCEPT, AUTHORIZATION, X_SIGNATURE, WALLET_ADDRESS];

/// Query keys used for routing inside the gateway, never forwarded
pub const INTERNAL_QUERY_KEYS: [&str; 1] = ["path"];

/// Routes whose second segment is a record id
const ID_ROUTES: [&str; 3] = ["apps", "reviews", "contributions"];

/// Path relative to the backend root, split into decoded segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendPath {
    segments: Vec<String>,
}

impl BackendPath {
    /// Parse a catch-all path such as `leaderboard` or `apps/images/3`.
    ///
    /// Rejects empty paths, `.`/`..` segments and empty inner segments. A
    /// missing id on an id route (`reviews`, `apps/`) is an invalid id.
    /// `admin/...` is never reachable this way; admin routes are gated.
    pub fn parse(raw: &str) -> ProxyResult<Self> {
        let trimmed = raw.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(ProxyError::InvalidPath);
        }

        let mut segments: Vec<&str> = trimmed.split('/').collect();

        match segments.as_slice() {
            ["admin", ..] => return Err(ProxyError::UnknownRoute),
            ["reviews" | "contributions"] => return Err(ProxyError::InvalidAppId),
            [route, ""] if ID_ROUTES.contains(route) => return Err(ProxyError::InvalidAppId),
            _ => {}
        }

        // A single trailing slash is tolerated
        if segments.len() > 1 && segments.last() == Some(&"") {
            segments.pop();
        }

        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Err(ProxyError::InvalidPath);
        }

        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
        })
    }

    /// `{route}/{id}` where `id` must be a numeric record id
    pub fn with_id(route: &str, raw_id: &str) -> ProxyResult<Self> {
        let id: AppId = raw_id.parse().map_err(|_| ProxyError::InvalidAppId)?;
        Ok(Self {
            segments: vec![route.to_string(), id.to_string()],
        })
    }

    /// Fixed route such as `config` or `admin/hide`
    pub fn fixed(path: &str) -> Self {
        Self {
            segments: path.split('/').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for BackendPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// How a route reports backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Relay backend status and message; unreachable backend is a generic 500
    Passthrough,
    /// Every failure is a 500 carrying this message
    Collapse(&'static str),
}

/// Copy allow-listed headers, keeping repeated values
pub fn select_forwarded_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut selected = HeaderMap::new();
    for name in FORWARDED_HEADERS.iter() {
        for value in inbound.get_all(name) {
            selected.append(name.clone(), value.clone());
        }
    }
    selected
}

/// Drop internal routing keys from a raw query string.
///
/// Surviving pairs keep their original encoding and order.
pub fn strip_internal_params(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let kept: Vec<&str> = raw
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = url::form_urlencoded::parse(pair.as_bytes())
                .next()
                .map(|(k, _)| k.into_owned())
                .unwrap_or_default();
            !INTERNAL_QUERY_KEYS.contains(&key.as_str())
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("&"))
    }
}
