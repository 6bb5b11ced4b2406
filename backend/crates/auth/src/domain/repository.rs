//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// User (credential store) repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user. Fails with `UserNameTaken` on a duplicate name.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Update name, password hash and role.
    ///
    /// Lockout fields keep their stored values unless `reset_lockout` is
    /// set, in which case they are cleared. Fails with `LastAdminProtected`
    /// if the write would demote the only remaining admin.
    async fn update(&self, user: &User, reset_lockout: bool) -> AuthResult<()>;

    /// Persist only the lockout fields (hot path of every login attempt)
    async fn update_login_state(&self, user: &User) -> AuthResult<()>;

    /// Returns whether a row was deleted. Fails with `LastAdminProtected`
    /// if the row is the only remaining admin.
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    async fn count_admins(&self) -> AuthResult<u64>;
}
