//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    login_lockout::LoginLockout, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = r#"
    user_id,
    user_name,
    password_hash,
    user_role,
    failed_login_attempts,
    lock_until,
    created_at,
    updated_at
"#;

fn map_unique_violation(e: sqlx::Error) -> AuthError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserNameTaken,
        _ => AuthError::Database(e),
    }
}

/// Whether `user_id` is the only admin.
///
/// Locks every admin row until the transaction ends, so concurrent
/// demotions and deletions are checked one after another.
async fn is_last_admin(conn: &mut PgConnection, user_id: &UserId) -> AuthResult<bool> {
    let admins = sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM users WHERE user_role = $1 FOR UPDATE",
    )
    .bind(UserRole::Admin.id())
    .fetch_all(conn)
    .await?;

    Ok(admins.as_slice() == [*user_id.as_uuid()])
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                password_hash,
                user_role,
                failed_login_attempts,
                lock_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.id())
        .bind(user.lockout.failed_attempts() as i32)
        .bind(user.lockout.lock_until())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1"
        ))
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)",
        )
        .bind(user_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User, reset_lockout: bool) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        if !user.is_admin() && is_last_admin(&mut tx, &user.user_id).await? {
            return Err(AuthError::LastAdminProtected);
        }

        sqlx::query(
            r#"
            UPDATE users SET
                user_name = $2,
                password_hash = $3,
                user_role = $4,
                failed_login_attempts = CASE WHEN $5 THEN 0 ELSE failed_login_attempts END,
                lock_until = CASE WHEN $5 THEN NULL ELSE lock_until END,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.id())
        .bind(reset_lockout)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;

        Ok(())
    }

    async fn update_login_state(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                failed_login_attempts = $2,
                lock_until = $3,
                updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.lockout.failed_attempts() as i32)
        .bind(user.lockout.lock_until())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        if is_last_admin(&mut tx, user_id).await? {
            return Err(AuthError::LastAdminProtected);
        }

        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }

    async fn count_admins(&self) -> AuthResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE user_role = $1")
                .bind(UserRole::Admin.id())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    password_hash: String,
    user_role: i16,
    failed_login_attempts: i32,
    lock_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        Ok(User {
            user_id: UserId::from(self.user_id),
            user_name: UserName::from_db(self.user_name),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            user_role,
            lockout: LoginLockout::from_parts(
                self.failed_login_attempts.max(0) as u32,
                self.lock_until,
            ),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
