//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{ChapterId, UserId, WorkId};

use crate::domain::entities::{Chapter, Comment, Feedback, Work, WorkListing};
use crate::domain::value_objects::ModerationStatus;
use crate::error::WorksResult;

/// Work repository trait
#[trait_variant::make(WorkRepository: Send)]
pub trait LocalWorkRepository {
    async fn create_work(&self, work: &Work) -> WorksResult<()>;

    async fn find_work(&self, work_id: &WorkId) -> WorksResult<Option<Work>>;

    /// Published works, newest first, with summed chapter views
    async fn list_published(&self) -> WorksResult<Vec<WorkListing>>;

    /// All works of one author regardless of moderation, newest first
    async fn list_by_author(&self, author_id: &UserId) -> WorksResult<Vec<Work>>;

    /// Moderation queue, oldest first. `None` lists every work.
    async fn list_by_moderation(
        &self,
        status: Option<ModerationStatus>,
    ) -> WorksResult<Vec<Work>>;

    /// Author-editable fields only
    async fn update_work(&self, work: &Work) -> WorksResult<()>;

    /// Persist moderation status together with the derived published flag
    async fn update_moderation(&self, work: &Work) -> WorksResult<()>;

    /// Deletes the work and everything under it. Returns whether a row was deleted.
    async fn delete_work(&self, work_id: &WorkId) -> WorksResult<bool>;
}

/// Chapter and reader engagement repository trait
#[trait_variant::make(ChapterRepository: Send)]
pub trait LocalChapterRepository {
    /// Fails with `ChapterNumberTaken` on a duplicate number within the work
    async fn create_chapter(&self, chapter: &Chapter) -> WorksResult<()>;

    async fn find_chapter(&self, chapter_id: &ChapterId) -> WorksResult<Option<Chapter>>;

    /// Ordered by chapter number
    async fn list_chapters(&self, work_id: &WorkId) -> WorksResult<Vec<Chapter>>;

    async fn update_chapter(&self, chapter: &Chapter) -> WorksResult<()>;

    async fn delete_chapter(&self, chapter_id: &ChapterId) -> WorksResult<bool>;

    /// Atomic increment. `None` if the chapter is gone.
    async fn increment_views(&self, chapter_id: &ChapterId) -> WorksResult<Option<i64>>;

    /// Idempotent. Returns the like count afterwards.
    async fn add_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64>;

    /// Idempotent. Returns the like count afterwards.
    async fn remove_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64>;

    async fn like_count(&self, chapter_id: &ChapterId) -> WorksResult<i64>;

    async fn has_liked(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<bool>;

    async fn add_comment(&self, comment: &Comment) -> WorksResult<()>;

    /// Newest first
    async fn list_comments(&self, chapter_id: &ChapterId) -> WorksResult<Vec<Comment>>;
}

/// Everything the works HTTP surface needs from one store
pub trait ContentStore:
    WorkRepository + ChapterRepository + FeedbackRepository + Clone + Send + Sync + 'static
{
}

impl<T> ContentStore for T where
    T: WorkRepository + ChapterRepository + FeedbackRepository + Clone + Send + Sync + 'static
{
}

/// Feedback repository trait
#[trait_variant::make(FeedbackRepository: Send)]
pub trait LocalFeedbackRepository {
    async fn create_feedback(&self, feedback: &Feedback) -> WorksResult<()>;

    /// Newest first
    async fn list_feedback(&self) -> WorksResult<Vec<Feedback>>;
}
