//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::policy::Denial;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserNameTaken,

    /// Wrong user name or wrong password; never says which
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is temporarily locked")]
    AccountLocked { until: DateTime<Utc> },

    /// No valid session on a route that needs one
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid CSRF token")]
    CsrfMismatch,

    /// Absent or hidden
    #[error("Not found")]
    NotFound,

    #[error("Admins cannot remove their own admin role")]
    SelfDemotion,

    #[error("The last admin cannot be removed or demoted")]
    LastAdminProtected,

    #[error("{0}")]
    Validation(String),

    /// Already classified error (e.g. password policy) passed through as is
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound | AuthError::NotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken
            | AuthError::InvalidCredentials
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden | AuthError::CsrfMismatch | AuthError::SelfDemotion => {
                ErrorKind::Forbidden
            }
            AuthError::LastAdminProtected => ErrorKind::Conflict,
            AuthError::App(err) => err.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound | AuthError::NotFound => "NOT_FOUND",
            AuthError::UserNameTaken => "USER_NAME_TAKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountLocked { .. } => "ACCOUNT_LOCKED",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::CsrfMismatch => "CSRF_MISMATCH",
            AuthError::SelfDemotion => "SELF_DEMOTION",
            AuthError::LastAdminProtected => "LAST_ADMIN_PROTECTED",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::App(_) => "APP_ERROR",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL",
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::App(err) => err,
            // Storage details stay in the logs
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error").with_code("INTERNAL")
            }
            AuthError::AccountLocked { .. } => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_action("Try again later"),
            AuthError::CsrfMismatch => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_action("Fetch a new CSRF token and retry"),
            _ => AppError::new(self.kind(), self.to_string()).with_code(self.code()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::App(err) if err.is_server_error() => {
                tracing::error!(error = ?err, "Auth internal error");
            }
            AuthError::AccountLocked { until } => {
                tracing::warn!(locked_until = %until, "Login attempt on locked account");
            }
            AuthError::CsrfMismatch => {
                tracing::warn!("CSRF token mismatch");
            }
            AuthError::Forbidden | AuthError::SelfDemotion | AuthError::LastAdminProtected => {
                tracing::warn!(error = %self, "Access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<Denial> for AuthError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => AuthError::Unauthenticated,
            Denial::Forbidden => AuthError::Forbidden,
            Denial::NotFound => AuthError::NotFound,
            Denial::SelfDemotion => AuthError::SelfDemotion,
            Denial::LastAdminProtected => AuthError::LastAdminProtected,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
