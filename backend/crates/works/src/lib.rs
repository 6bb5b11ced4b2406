//! Works (Content Publishing) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Works, chapters, engagement, feedback; moderation state machine
//! - `application/` - Use cases and input limits
//! - `infra/` - Postgres and in-memory content stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Visibility Model
//! - A work is public only while its moderation status is `published`
//! - New works start `pending`; only admins move them through moderation
//! - Chapters follow their parent work for both visibility and ownership
//! - Hidden content reads as 404 to anyone but its author and admins
//! - Every access decision goes through `auth::policy::authorize`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::WorksConfig;
pub use domain::repository::ContentStore;
pub use error::{WorksError, WorksResult};
pub use infra::{InMemoryWorksRepository, PgWorksRepository};
pub use presentation::{WorksAppState, works_routes};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
