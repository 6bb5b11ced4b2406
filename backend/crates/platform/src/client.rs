//! Client identification utilities
//!
//! Resolves the caller's address for audit logging of security events
//! (failed logins, lockouts, CSRF rejections).

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or(direct_ip)
}

/// Same as [`extract_client_ip`], rendered for log fields.
pub fn client_ip_for_log(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    extract_client_ip(headers, direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
