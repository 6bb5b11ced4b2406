//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod admin;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{Caller, csrf_protect, resolve_session};
pub use router::{admin_user_routes, auth_router, auth_routes, with_auth_layers};
