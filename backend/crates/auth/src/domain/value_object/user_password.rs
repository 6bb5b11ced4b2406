//! User Password Value Object
//!
//! Domain wrapper over `platform::password`.
//!
//! Hashing is an explicit step done by the use case before a `User` is
//! constructed; entities only ever hold a [`UserPassword`].
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::HashParams;
//!
//! let raw = RawPassword::new("password123".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None, HashParams::fast()).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashParams, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with policy validation (8 to 128 chars).
    ///
    /// Used for registration and password changes.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, actual } => AppError::bad_request(format!(
                "Password must be at least {} characters (got {})",
                min, actual
            ))
            .with_code("VALIDATION_FAILED")
            .with_action("Please choose a longer password"),

            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                max, actual
            ))
            .with_code("VALIDATION_FAILED")
            .with_action("Please choose a shorter password"),

            PasswordPolicyError::EmptyOrWhitespace => AppError::bad_request("Password is required")
                .with_code("VALIDATION_FAILED")
                .with_action("Please enter a password"),

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_code("VALIDATION_FAILED")
                    .with_action("Please remove any control characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Login candidate. No policy, every guess is verified the same way.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string. Safe to store.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password.
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        params: HashParams,
    ) -> AppResult<Self> {
        let hashed = raw.inner().hash(pepper, params).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AppError::internal(format!("Password hashing failed: {}", msg))
            }
            other => AppError::internal("Password hashing failed").with_source(other),
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification. `pepper` must match the one used for hashing.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================
