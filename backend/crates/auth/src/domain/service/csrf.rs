//! CSRF double-submit tokens.
//!
//! A random token is stored in a cookie and echoed by the client in a custom
//! header. The pair must match byte for byte on every mutating request.

use http::Method;
use platform::crypto::{constant_time_eq, random_token};

/// Entropy of a freshly issued token, in bytes.
const CSRF_TOKEN_BYTES: usize = 32;

/// Generate a new CSRF token (URL-safe base64).
pub fn generate_csrf_token() -> String {
    random_token(CSRF_TOKEN_BYTES)
}

/// Methods that change state and therefore require a matching token.
pub fn requires_csrf_check(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Double-submit comparison. A missing side never matches.
pub fn csrf_tokens_match(cookie_token: Option<&str>, header_token: Option<&str>) -> bool {
    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) if !cookie.is_empty() => {
            constant_time_eq(cookie.as_bytes(), header.as_bytes())
        }
        _ => false,
    }
}
