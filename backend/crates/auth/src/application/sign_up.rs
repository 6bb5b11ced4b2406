//! Sign Up Use Case
//!
//! Creates a new user account and signs it in.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::token_codec::IssuedToken;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    pub token: IssuedToken,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: SignUpInput,
        now: DateTime<Utc>,
    ) -> AuthResult<SignUpOutput> {
        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Cheap check first; the unique constraint still catches races in `create`
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash =
            UserPassword::from_raw(&raw_password, self.config.pepper(), self.config.hash_params)?;

        let user = User::new(user_name, password_hash, UserRole::User);
        self.user_repo.create(&user).await?;

        let token = self.config.token_codec().issue(user.user_id, now);

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput { user, token })
    }
}
