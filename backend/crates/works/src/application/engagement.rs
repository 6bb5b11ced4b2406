//! Reader Engagement Use Case
//!
//! Views are open to anyone who can read the chapter; likes and comments
//! additionally need a signed-in caller.

use std::sync::Arc;

use auth::policy::{Identity, Operation};
use kernel::id::ChapterId;

use crate::application::access::authorized_chapter;
use crate::application::config::WorksConfig;
use crate::domain::entities::Comment;
use crate::domain::repository::{ChapterRepository, WorkRepository};
use crate::domain::services::clean_text;
use crate::error::{WorksError, WorksResult};

pub struct EngagementUseCase<R>
where
    R: WorkRepository + ChapterRepository,
{
    repo: Arc<R>,
    config: Arc<WorksConfig>,
}

impl<R> EngagementUseCase<R>
where
    R: WorkRepository + ChapterRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<WorksConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns the view count after incrementing.
    pub async fn record_view(&self, identity: &Identity, chapter_id: &ChapterId) -> WorksResult<i64> {
        authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::RecordView).await?;

        self.repo
            .increment_views(chapter_id)
            .await?
            .ok_or(WorksError::ChapterNotFound)
    }

    /// Idempotent. Returns the like count.
    pub async fn like(&self, identity: &Identity, chapter_id: &ChapterId) -> WorksResult<i64> {
        let me = identity.require()?.user_id;
        authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Like).await?;

        self.repo.add_like(chapter_id, &me).await
    }

    /// Idempotent. Returns the like count.
    pub async fn unlike(&self, identity: &Identity, chapter_id: &ChapterId) -> WorksResult<i64> {
        let me = identity.require()?.user_id;
        authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Like).await?;

        self.repo.remove_like(chapter_id, &me).await
    }

    /// Adds a comment and returns the chapter's comments, newest first.
    pub async fn comment(
        &self,
        identity: &Identity,
        chapter_id: &ChapterId,
        text: &str,
    ) -> WorksResult<Vec<Comment>> {
        let me = identity.require()?;
        authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Comment).await?;

        let text = clean_text("Comment", text, 1, self.config.comment_max)?;
        let comment = Comment::new(*chapter_id, me.user_id, me.user_name.as_str(), text);
        self.repo.add_comment(&comment).await?;

        tracing::debug!(chapter_id = %chapter_id, user_id = %me.user_id, "Comment added");
        self.repo.list_comments(chapter_id).await
    }
}
