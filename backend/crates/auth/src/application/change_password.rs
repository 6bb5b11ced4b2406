//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::policy::{self, Identity, Operation, Resource};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    /// Account to change; the caller's own when `None`
    pub target: Option<UserId>,
    /// Required when changing one's own password
    pub current_password: Option<String>,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, identity: &Identity, input: ChangePasswordInput) -> AuthResult<()> {
        let caller = identity.require()?;
        let target = input.target.unwrap_or(caller.user_id);

        policy::authorize(identity, Operation::Mutate, Resource::Account(target))?;

        let mut user = self
            .user_repo
            .find_by_id(&target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if target == caller.user_id {
            let current = RawPassword::candidate(input.current_password.unwrap_or_default());
            if !user.password_hash.verify(&current, self.config.pepper()) {
                return Err(AuthError::InvalidCredentials);
            }
        }

        let raw = RawPassword::new(input.new_password)?;
        let hash = UserPassword::from_raw(&raw, self.config.pepper(), self.config.hash_params)?;
        user.set_password(hash);
        self.user_repo.update(&user, true).await?;

        tracing::info!(
            user_id = %user.user_id,
            changed_by = %caller.user_id,
            "Password changed"
        );

        Ok(())
    }
}
