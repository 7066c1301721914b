//! Client identification utilities
//!
//! Resolves the caller's IP for rate limiting and request logs.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract client IP address
///
/// Forwarding headers are only believed when the socket peer is one of
/// `trusted_proxies`. Otherwise any caller could pick its own identity.
/// Behind a trusted proxy, `X-Forwarded-For` is read right to left and the
/// first hop that is not itself a trusted proxy wins, then `X-Real-IP`.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    let peer = direct_ip?;
    if !trusted_proxies.contains(&peer) {
        return Some(peer);
    }

    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        for hop in xff.rsplit(',') {
            match hop.trim().parse::<IpAddr>() {
                Ok(ip) if trusted_proxies.contains(&ip) => continue,
                Ok(ip) => return Some(ip),
                Err(_) => break,
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if let Ok(ip) = real_ip.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }
    Some(peer)
}

/// Rate-limit key for a client; unknown clients share one bucket
pub fn client_key(ip: Option<IpAddr>) -> String {
    ip.map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
