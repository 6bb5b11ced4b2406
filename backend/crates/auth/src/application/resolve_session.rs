//! Resolve Session Use Case
//!
//! Turns a presented session token into an [`Identity`]. The role is always
//! read from the credential store, never from the token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::policy::{Identity, Principal};
use crate::domain::repository::UserRepository;
use crate::domain::service::token_codec::TokenCodec;
use crate::error::AuthResult;

/// Resolution result
#[derive(Debug, Clone)]
pub struct SessionResolution {
    pub identity: Identity,
    /// A token was presented but is unusable (bad signature, expired, or the
    /// user no longer exists). The caller should clear it.
    pub stale: bool,
}

impl SessionResolution {
    fn anonymous(stale: bool) -> Self {
        Self {
            identity: Identity::Anonymous,
            stale,
        }
    }
}

/// Resolve session use case
pub struct ResolveSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    codec: TokenCodec,
}

impl<U> ResolveSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            codec: config.token_codec(),
        }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<SessionResolution> {
        self.execute_at(token, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> AuthResult<SessionResolution> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(SessionResolution::anonymous(false));
        };

        let claims = match self.codec.verify(token, now) {
            Ok(claims) => claims,
            Err(_) => {
                tracing::debug!("Rejected session token");
                return Ok(SessionResolution::anonymous(true));
            }
        };

        let Some(user) = self.user_repo.find_by_id(&claims.user_id).await? else {
            tracing::debug!(user_id = %claims.user_id, "Session token for deleted user");
            return Ok(SessionResolution::anonymous(true));
        };

        Ok(SessionResolution {
            identity: Identity::User(Principal {
                user_id: user.user_id,
                user_name: user.user_name,
                role: user.user_role,
            }),
            stale: false,
        })
    }
}
