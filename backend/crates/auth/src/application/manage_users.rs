//! Admin User Management Use Case
//!
//! Every operation is authorized against the admin area first; role changes
//! and deletions also pass the last-admin / self-demotion checks.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::policy::{self, AdminArea, Identity, Operation, Resource};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct CreateUserInput {
    pub user_name: String,
    pub password: String,
    pub role: Option<UserRole>,
}

/// Fields left `None` are unchanged.
#[derive(Default)]
pub struct UpdateUserInput {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    fn authorize_admin(identity: &Identity) -> AuthResult<()> {
        policy::authorize(
            identity,
            Operation::Administer,
            Resource::Admin(AdminArea::Users),
        )?;
        Ok(())
    }

    fn hash(&self, password: String) -> AuthResult<UserPassword> {
        let raw = RawPassword::new(password)?;
        Ok(UserPassword::from_raw(
            &raw,
            self.config.pepper(),
            self.config.hash_params,
        )?)
    }

    pub async fn list(&self, identity: &Identity) -> AuthResult<Vec<User>> {
        Self::authorize_admin(identity)?;
        self.user_repo.list().await
    }

    pub async fn create(&self, identity: &Identity, input: CreateUserInput) -> AuthResult<User> {
        Self::authorize_admin(identity)?;

        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password_hash = self.hash(input.password)?;
        let user = User::new(user_name, password_hash, input.role.unwrap_or_default());
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.user_role,
            created_by = ?identity.user_id(),
            "User provisioned"
        );

        Ok(user)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        target: UserId,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        Self::authorize_admin(identity)?;

        if input.user_name.is_none() && input.password.is_none() && input.role.is_none() {
            return Err(AuthError::Validation(
                "At least one updatable field is required".into(),
            ));
        }

        let mut user = self
            .user_repo
            .find_by_id(&target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(role) = input.role {
            if role != user.user_role {
                let admin_count = self.user_repo.count_admins().await?;
                policy::authorize_role_change(identity, target, user.user_role, role, admin_count)?;
                user.set_role(role);
            }
        }

        if let Some(name) = input.user_name {
            let user_name =
                UserName::new(name).map_err(|e| AuthError::Validation(e.to_string()))?;
            if user_name != user.user_name {
                if self.user_repo.exists_by_user_name(&user_name).await? {
                    return Err(AuthError::UserNameTaken);
                }
                user.set_user_name(user_name);
            }
        }

        let password_changed = input.password.is_some();
        if let Some(password) = input.password {
            user.set_password(self.hash(password)?);
        }

        self.user_repo.update(&user, password_changed).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.user_role,
            updated_by = ?identity.user_id(),
            "User updated"
        );

        // Lockout fields come from storage, not from the snapshot read above
        self.user_repo
            .find_by_id(&target)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn delete(&self, identity: &Identity, target: UserId) -> AuthResult<()> {
        Self::authorize_admin(identity)?;

        let user = self
            .user_repo
            .find_by_id(&target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let admin_count = self.user_repo.count_admins().await?;
        policy::authorize_user_deletion(identity, user.user_role, admin_count)?;

        if !self.user_repo.delete(&target).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(
            user_id = %target,
            deleted_by = ?identity.user_id(),
            "User deleted"
        );

        Ok(())
    }

    /// Provision `user_name` as an admin unless a user with that name exists.
    ///
    /// Startup only; bypasses the engine since no caller exists yet.
    pub async fn ensure_admin(&self, user_name: &str, password: String) -> AuthResult<bool> {
        let user_name =
            UserName::new(user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Ok(false);
        }

        let password_hash = self.hash(password)?;
        let user = User::new(user_name, password_hash, UserRole::Admin);
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "Bootstrap admin created");
        Ok(true)
    }
}
