//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Credential store entities, login guard, token codec, authorization policy
//! - `application/` - Use cases and configuration
//! - `infra/` - Postgres and in-memory credential stores
//! - `presentation/` - HTTP handlers, DTOs, router, session and CSRF middleware
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application pepper
//! - Stateless HMAC-SHA256 session tokens in an HTTP-only cookie
//!   (legacy `x-auth-token` header accepted as fallback)
//! - Role is read from the credential store on every request, never from the token
//! - Account lockout after consecutive failed logins, lazily expired
//! - CSRF double-submit check on every mutating request
//! - All access decisions go through `domain::policy::authorize`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::policy::{Identity, Principal};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::{AuthAppState, Caller, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod policy {
    pub use crate::domain::policy::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
