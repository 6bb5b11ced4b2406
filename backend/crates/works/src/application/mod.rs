//! Application Layer
//!
//! Use cases and application services.

pub mod access;
pub mod chapters;
pub mod config;
pub mod engagement;
pub mod feedback;
pub mod moderation;
pub mod works;

// Re-exports
pub use chapters::{ChapterDetail, ChapterInput, ChapterUpdateInput, ManageChaptersUseCase};
pub use config::WorksConfig;
pub use engagement::EngagementUseCase;
pub use feedback::{FeedbackInput, FeedbackUseCase};
pub use moderation::ModerateWorksUseCase;
pub use works::{ManageWorksUseCase, WorkInput, WorkUpdateInput};
