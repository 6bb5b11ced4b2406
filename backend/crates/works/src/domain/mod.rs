//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Work, Chapter, Comment, Feedback)
//! - Domain value objects (WorkType, ModerationStatus, ChapterContent, Email)
//! - Domain services (input cleaning, moderation transitions)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
