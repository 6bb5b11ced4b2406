//! Domain Layer
//!
//! Contains entities, value objects, pure services, the authorization
//! policy and repository traits.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use policy::{Identity, Principal};
pub use repository::UserRepository;
