//! Session Token Codec
//!
//! Compact HMAC-SHA256 signed session tokens:
//!
//! ```text
//! base64url("{user_id}.{issued_at}.{expires_at}") "." base64url(hmac(payload))
//! ```
//!
//! Timestamps are Unix seconds. Tokens are not stored server-side; a token is
//! valid iff its signature verifies and `now < expires_at`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_object::user_id::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Verification failure. Expired, tampered and malformed tokens are
/// deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid session token")]
pub struct InvalidToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

#[derive(Clone)]
pub struct TokenCodec {
    secret: [u8; 32],
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: [u8; 32], lifetime: Duration) -> Self {
        Self { secret, lifetime }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length, a 32-byte key cannot fail
        match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC-SHA256 accepts 32-byte keys"),
        }
    }

    /// Sign a token for `user_id`, valid from `now` for the configured lifetime.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> IssuedToken {
        // Second precision so the claims survive a round trip unchanged
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let payload = format!(
            "{}.{}.{}",
            user_id,
            issued_at.timestamp(),
            expires_at.timestamp()
        );
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload.as_bytes());

        let mut mac = self.mac();
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();

        IssuedToken {
            token: format!("{}.{}", payload_b64, URL_SAFE_NO_PAD.encode(signature)),
            claims: TokenClaims {
                user_id,
                issued_at,
                expires_at,
            },
        }
    }

    /// Verify signature (constant time) and expiry.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, InvalidToken> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(InvalidToken)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| InvalidToken)?;

        let mut mac = self.mac();
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| InvalidToken)?;

        // Signature is valid from here on; the payload is ours
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| InvalidToken)?;
        let payload = std::str::from_utf8(&payload).map_err(|_| InvalidToken)?;

        let mut parts = payload.split('.');
        let (Some(user_id), Some(issued_at), Some(expires_at), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(InvalidToken);
        };

        let user_id = Uuid::parse_str(user_id).map_err(|_| InvalidToken)?;
        let issued_at = parse_timestamp(issued_at)?;
        let expires_at = parse_timestamp(expires_at)?;

        if now >= expires_at {
            return Err(InvalidToken);
        }

        Ok(TokenClaims {
            user_id: UserId::from_uuid(user_id),
            issued_at,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, InvalidToken> {
    let secs: i64 = value.parse().map_err(|_| InvalidToken)?;
    DateTime::from_timestamp(secs, 0).ok_or(InvalidToken)
}
