//! Chapter Use Cases
//!
//! Chapters inherit the visibility and ownership of their parent work.

use std::sync::Arc;

use auth::policy::{Identity, Operation};
use kernel::id::{ChapterId, WorkId};

use crate::application::access::{authorized_chapter, authorized_work};
use crate::application::config::WorksConfig;
use crate::domain::entities::{Chapter, ChapterDraft, ChapterView, Comment};
use crate::domain::repository::{ChapterRepository, WorkRepository};
use crate::domain::services::{clean_content, clean_text};
use crate::domain::value_objects::{ChapterContent, WorkType};
use crate::error::{WorksError, WorksResult};

#[derive(Debug, Clone)]
pub struct ChapterInput {
    pub chapter_number: i32,
    pub title: String,
    pub content: ChapterContent,
}

#[derive(Debug, Clone, Default)]
pub struct ChapterUpdateInput {
    pub title: Option<String>,
    pub content: Option<ChapterContent>,
}

/// A readable chapter with everything a reader page shows
#[derive(Debug, Clone)]
pub struct ChapterDetail {
    pub view: ChapterView,
    pub work_type: WorkType,
    pub comments: Vec<Comment>,
}

pub struct ManageChaptersUseCase<R>
where
    R: WorkRepository + ChapterRepository,
{
    repo: Arc<R>,
    config: Arc<WorksConfig>,
}

impl<R> ManageChaptersUseCase<R>
where
    R: WorkRepository + ChapterRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<WorksConfig>) -> Self {
        Self { repo, config }
    }

    fn clean_title(&self, title: &str) -> WorksResult<String> {
        clean_text("Title", title, 1, self.config.chapter_title_max)
    }

    /// Chapters of a readable work, by chapter number
    pub async fn list(&self, identity: &Identity, work_id: &WorkId) -> WorksResult<Vec<Chapter>> {
        authorized_work(self.repo.as_ref(), identity, work_id, Operation::Read).await?;
        self.repo.list_chapters(work_id).await
    }

    pub async fn create(
        &self,
        identity: &Identity,
        work_id: &WorkId,
        input: ChapterInput,
    ) -> WorksResult<Chapter> {
        authorized_work(self.repo.as_ref(), identity, work_id, Operation::Mutate).await?;

        if !(1..=self.config.chapter_number_max).contains(&input.chapter_number) {
            return Err(WorksError::Validation(format!(
                "Chapter number must be between 1 and {}",
                self.config.chapter_number_max
            )));
        }
        let draft = ChapterDraft {
            chapter_number: input.chapter_number,
            title: self.clean_title(&input.title)?,
            content: clean_content(&input.content, &self.config)?,
        };

        let chapter = Chapter::new(*work_id, draft);
        self.repo.create_chapter(&chapter).await?;

        tracing::info!(
            chapter_id = %chapter.chapter_id,
            work_id = %work_id,
            chapter_number = chapter.chapter_number,
            "Chapter created"
        );
        Ok(chapter)
    }

    pub async fn get(&self, identity: &Identity, chapter_id: &ChapterId) -> WorksResult<ChapterDetail> {
        let (chapter, work) =
            authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Read).await?;

        let likes = self.repo.like_count(chapter_id).await?;
        let liked_by_caller = match identity.user_id() {
            Some(user_id) => self.repo.has_liked(chapter_id, &user_id).await?,
            None => false,
        };
        let comments = self.repo.list_comments(chapter_id).await?;

        Ok(ChapterDetail {
            view: ChapterView {
                chapter,
                likes,
                liked_by_caller,
            },
            work_type: work.details.work_type,
            comments,
        })
    }

    pub async fn update(
        &self,
        identity: &Identity,
        chapter_id: &ChapterId,
        input: ChapterUpdateInput,
    ) -> WorksResult<Chapter> {
        let (mut chapter, _) =
            authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Mutate)
                .await?;

        if input.title.is_none() && input.content.is_none() {
            return Err(WorksError::Validation(
                "At least one updatable field is required".into(),
            ));
        }
        let title = input.title.map(|t| self.clean_title(&t)).transpose()?;
        let content = input
            .content
            .map(|c| clean_content(&c, &self.config))
            .transpose()?;

        chapter.revise(title, content);
        self.repo.update_chapter(&chapter).await?;

        tracing::info!(chapter_id = %chapter_id, updated_by = ?identity.user_id(), "Chapter updated");
        Ok(chapter)
    }

    pub async fn delete(&self, identity: &Identity, chapter_id: &ChapterId) -> WorksResult<()> {
        authorized_chapter(self.repo.as_ref(), identity, chapter_id, Operation::Mutate).await?;

        if !self.repo.delete_chapter(chapter_id).await? {
            return Err(WorksError::ChapterNotFound);
        }

        tracing::info!(chapter_id = %chapter_id, deleted_by = ?identity.user_id(), "Chapter deleted");
        Ok(())
    }
}
