//! Works Error Types
//!
//! This module provides content-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::policy::Denial;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::ModerationStatus;

/// Works-specific result type alias
pub type WorksResult<T> = Result<T, WorksError>;

/// Works-specific error variants
#[derive(Debug, Error)]
pub enum WorksError {
    /// Absent, or hidden from the caller
    #[error("Work not found")]
    WorkNotFound,

    #[error("Chapter not found")]
    ChapterNotFound,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not authorized")]
    Forbidden,

    /// Moderation state machine refused the move
    #[error("Cannot move a work from {from} to {to}")]
    InvalidTransition {
        from: ModerationStatus,
        to: ModerationStatus,
    },

    #[error("Chapter number already exists for this work")]
    ChapterNumberTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorksError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorksError::WorkNotFound | WorksError::ChapterNotFound => ErrorKind::NotFound,
            WorksError::Unauthenticated => ErrorKind::Unauthorized,
            WorksError::Forbidden => ErrorKind::Forbidden,
            WorksError::InvalidTransition { .. } | WorksError::ChapterNumberTaken => {
                ErrorKind::Conflict
            }
            WorksError::Validation(_) => ErrorKind::BadRequest,
            WorksError::Database(_) | WorksError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorksError::WorkNotFound | WorksError::ChapterNotFound => "NOT_FOUND",
            WorksError::Unauthenticated => "UNAUTHENTICATED",
            WorksError::Forbidden => "FORBIDDEN",
            WorksError::InvalidTransition { .. } => "INVALID_TRANSITION",
            WorksError::ChapterNumberTaken => "CHAPTER_NUMBER_TAKEN",
            WorksError::Validation(_) => "VALIDATION_FAILED",
            WorksError::Database(_) | WorksError::Internal(_) => "INTERNAL",
        }
    }

    /// Map an engine denial, naming the resource that was hidden.
    pub fn from_denial(denial: Denial, not_found: WorksError) -> Self {
        match denial {
            Denial::Unauthenticated => WorksError::Unauthenticated,
            Denial::NotFound => not_found,
            Denial::Forbidden | Denial::SelfDemotion | Denial::LastAdminProtected => {
                WorksError::Forbidden
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            WorksError::Database(e) => {
                tracing::error!(error = %e, "Works database error");
            }
            WorksError::Internal(msg) => {
                tracing::error!(message = %msg, "Works internal error");
            }
            WorksError::Forbidden => {
                tracing::warn!("Content access denied");
            }
            WorksError::InvalidTransition { from, to } => {
                tracing::warn!(%from, %to, "Rejected moderation transition");
            }
            _ => {
                tracing::debug!(error = %self, "Works error");
            }
        }
    }
}

impl From<Denial> for WorksError {
    fn from(denial: Denial) -> Self {
        WorksError::from_denial(denial, WorksError::WorkNotFound)
    }
}

impl From<WorksError> for AppError {
    fn from(err: WorksError) -> Self {
        match err {
            // Storage details stay in the logs
            WorksError::Database(_) | WorksError::Internal(_) => {
                AppError::internal("Internal server error").with_code("INTERNAL")
            }
            _ => AppError::new(err.kind(), err.to_string()).with_code(err.code()),
        }
    }
}

impl IntoResponse for WorksError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(WorksError::WorkNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(WorksError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WorksError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            WorksError::InvalidTransition {
                from: ModerationStatus::Pending,
                to: ModerationStatus::Pending,
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            WorksError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_denial_names_the_hidden_resource() {
        assert!(matches!(
            WorksError::from_denial(Denial::NotFound, WorksError::ChapterNotFound),
            WorksError::ChapterNotFound
        ));
        assert!(matches!(WorksError::from(Denial::NotFound), WorksError::WorkNotFound));
        assert!(matches!(
            WorksError::from(Denial::Unauthenticated),
            WorksError::Unauthenticated
        ));
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let app = AppError::from(WorksError::Internal("pool exhausted".into()));
        assert!(!app.message().contains("pool"));
        assert_eq!(app.code(), Some("INTERNAL"));
    }
}
