//! User Entity
//!
//! Identity record: credentials, role and lockout state.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    login_lockout::LoginLockout, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};

/// User entity
///
/// The password is hashed by the caller before construction.
#[derive(Debug, Clone)]
pub struct User {
    /// Immutable identifier
    pub user_id: UserId,
    /// Unique, case-sensitive login handle
    pub user_name: UserName,
    pub password_hash: UserPassword,
    pub user_role: UserRole,
    pub lockout: LoginLockout,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(user_name: UserName, password_hash: UserPassword, user_role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            user_role,
            lockout: LoginLockout::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_user_name(&mut self, user_name: UserName) {
        self.user_name = user_name;
        self.updated_at = Utc::now();
    }

    /// Replace the password hash. Clears any lockout.
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.lockout.reset();
        self.updated_at = Utc::now();
    }
}
