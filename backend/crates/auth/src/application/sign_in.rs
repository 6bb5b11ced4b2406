//! Sign In Use Case
//!
//! Verifies credentials through the login attempt guard and issues a
//! session token.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use platform::password::HashParams;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::login_guard::{LoginAttemptGuard, LoginOutcome};
use crate::domain::service::token_codec::{IssuedToken, TokenCodec};
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub token: IssuedToken,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    guard: LoginAttemptGuard,
    codec: TokenCodec,
    /// Verified against for unknown users so both paths cost one hash check
    dummy_hash: Option<Arc<UserPassword>>,
}

/// One dummy hash per cost setting, shared by every use case instance
static DUMMY_HASHES: Mutex<Vec<(HashParams, Arc<UserPassword>)>> = Mutex::new(Vec::new());

pub(crate) fn dummy_hash(params: HashParams) -> Option<Arc<UserPassword>> {
    let mut cache = DUMMY_HASHES.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some((_, hash)) = cache.iter().find(|(cached, _)| *cached == params) {
        return Some(hash.clone());
    }

    let dummy = RawPassword::candidate("dummy-password-for-timing".to_string());
    let hash = Arc::new(UserPassword::from_raw(&dummy, None, params).ok()?);
    cache.push((params, hash.clone()));
    Some(hash)
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        let dummy_hash = dummy_hash(config.hash_params);

        Self {
            guard: config.login_guard(),
            codec: config.token_codec(),
            dummy_hash,
            user_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: SignInInput,
        now: DateTime<Utc>,
    ) -> AuthResult<SignInOutput> {
        let candidate = RawPassword::candidate(input.password);

        // A malformed name cannot exist; treat it as an unknown user
        let user = match UserName::new(&input.user_name) {
            Ok(user_name) => self.user_repo.find_by_user_name(&user_name).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.burn_verification(&candidate);
            tracing::warn!("Login attempt for unknown user name");
            return Err(AuthError::InvalidCredentials);
        };

        let pepper = self.config.pepper();
        let evaluation = self.guard.evaluate(
            user,
            |u| u.password_hash.verify(&candidate, pepper),
            now,
        );

        if evaluation.changed {
            self.user_repo.update_login_state(&evaluation.user).await?;
        }

        let user = evaluation.user;
        match evaluation.outcome {
            LoginOutcome::AccountLocked { until } => Err(AuthError::AccountLocked { until }),
            LoginOutcome::InvalidCredentials => {
                if let Some(until) = user.lockout.locked_at(now) {
                    tracing::warn!(
                        user_id = %user.user_id,
                        failed_attempts = user.lockout.failed_attempts(),
                        locked_until = %until,
                        "Account locked after repeated failures"
                    );
                } else {
                    tracing::warn!(
                        user_id = %user.user_id,
                        failed_attempts = user.lockout.failed_attempts(),
                        "Invalid password"
                    );
                }
                Err(AuthError::InvalidCredentials)
            }
            LoginOutcome::Success => {
                let token = self.codec.issue(user.user_id, now);
                tracing::info!(user_id = %user.user_id, "User signed in");
                Ok(SignInOutput { user, token })
            }
        }
    }

    fn burn_verification(&self, candidate: &RawPassword) {
        if let Some(hash) = &self.dummy_hash {
            let _ = hash.verify(candidate, self.config.pepper());
        }
    }
}
