//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::HashParams;

use crate::domain::service::login_guard::{
    DEFAULT_LOCKOUT_MINUTES, DEFAULT_LOCKOUT_THRESHOLD, LoginAttemptGuard,
};
use crate::domain::service::token_codec::TokenCodec;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Upper bound for the token lifetime and the lockout duration
pub const MAX_CONFIGURED_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Header accepted as a fallback token source for older clients
    pub legacy_token_header: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session token lifetime (no refresh)
    pub session_ttl: Duration,
    /// Consecutive failures before lockout
    pub lockout_threshold: u32,
    pub lockout_duration: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    /// Paths excluded from the CSRF check (the token-issuing endpoint)
    pub csrf_exempt_paths: Vec<String>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id cost for new hashes
    pub hash_params: HashParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            legacy_token_header: "x-auth-token".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(3600),
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_duration: Duration::from_secs(DEFAULT_LOCKOUT_MINUTES as u64 * 60),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            csrf_cookie_name: "_csrf".to_string(),
            csrf_header_name: "x-csrf-token".to_string(),
            csrf_exempt_paths: vec!["/api/auth/csrf-token".to_string()],
            password_pepper: None,
            hash_params: HashParams::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, Lax)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secret()
        }
    }

    /// Development config with minimal hashing cost, for tests.
    pub fn testing() -> Self {
        Self {
            hash_params: HashParams::fast(),
            ..Self::development()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(self.session_secret, to_chrono(self.session_ttl))
    }

    pub fn login_guard(&self) -> LoginAttemptGuard {
        LoginAttemptGuard::new(self.lockout_threshold, to_chrono(self.lockout_duration))
    }

    /// Session cookie; lives as long as the token.
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.min(MAX_CONFIGURED_DURATION).as_secs() as i64),
        }
    }

    /// CSRF cookie; browser-session scoped.
    pub fn csrf_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.csrf_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    pub fn is_csrf_exempt(&self, path: &str) -> bool {
        self.csrf_exempt_paths.iter().any(|p| p == path)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("legacy_token_header", &self.legacy_token_header)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("lockout_threshold", &self.lockout_threshold)
            .field("lockout_duration", &self.lockout_duration)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("csrf_cookie_name", &self.csrf_cookie_name)
            .field("csrf_header_name", &self.csrf_header_name)
            .field("csrf_exempt_paths", &self.csrf_exempt_paths)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("hash_params", &self.hash_params)
            .finish()
    }
}

/// Clamped to [`MAX_CONFIGURED_DURATION`]
fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration.min(MAX_CONFIGURED_DURATION))
        .unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_id::UserId;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.lockout_threshold, 15);
        assert_eq!(config.lockout_duration, Duration::from_secs(15 * 60));
        assert_eq!(config.legacy_token_header, "x-auth-token");
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Strict);
        assert!(config.is_csrf_exempt("/api/auth/csrf-token"));
        assert!(!config.is_csrf_exempt("/api/auth/login"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = AuthConfig::default().session_cookie().build_set_cookie("tok");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_development_is_lax_and_insecure() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert_ne!(config.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_oversized_durations_are_clamped() {
        let config = AuthConfig {
            session_ttl: Duration::from_secs(u64::MAX / 2),
            lockout_duration: Duration::from_secs(10_000_000_000_000),
            ..AuthConfig::testing()
        };
        let now = chrono::Utc::now();

        let issued = config.token_codec().issue(UserId::new(), now);
        assert!(issued.claims.expires_at > now);
        assert!(config.token_codec().verify(&issued.token, now).is_ok());

        let cookie = config.session_cookie().build_set_cookie("tok");
        assert!(cookie.contains(&format!("Max-Age={}", MAX_CONFIGURED_DURATION.as_secs())));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", AuthConfig::with_random_secret());
        assert!(debug.contains("REDACTED"));
    }
}
