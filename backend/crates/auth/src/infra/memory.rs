//! In-memory credential store
//!
//! Same contract as the Postgres repository, including the unique
//! user name. Used by tests and local runs without a database.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_last_admin(users: &HashMap<UserId, User>, user_id: &UserId) -> bool {
    let mut admins = users.values().filter(|u| u.is_admin());
    matches!((admins.next(), admins.next()), (Some(only), None) if &only.user_id == user_id)
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.user_name == user_name).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| &u.user_name == user_name))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update(&self, user: &User, reset_lockout: bool) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.user_id != user.user_id && u.user_name == user.user_name)
        {
            return Err(AuthError::UserNameTaken);
        }
        if !user.is_admin() && is_last_admin(&users, &user.user_id) {
            return Err(AuthError::LastAdminProtected);
        }
        if let Some(existing) = users.get_mut(&user.user_id) {
            existing.user_name = user.user_name.clone();
            existing.password_hash = user.password_hash.clone();
            existing.user_role = user.user_role;
            existing.updated_at = user.updated_at;
            if reset_lockout {
                existing.lockout.reset();
            }
        }
        Ok(())
    }

    async fn update_login_state(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.get_mut(&user.user_id) {
            existing.lockout = user.lockout;
            existing.updated_at = user.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        if is_last_admin(&users, user_id) {
            return Err(AuthError::LastAdminProtected);
        }
        Ok(users.remove(user_id).is_some())
    }

    async fn count_admins(&self) -> AuthResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.is_admin()).count() as u64)
    }
}
