//! In-memory content store
//!
//! Same contract as the Postgres repository: unique chapter numbers per
//! work, idempotent likes, cascading deletes. Author names are resolved
//! through the shared credential store, so renames show up as they do
//! with the SQL join.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use auth::InMemoryAuthRepository;
use auth::domain::repository::UserRepository;
use tokio::sync::RwLock;

use kernel::id::{ChapterId, UserId, WorkId};

use crate::domain::entities::{Chapter, Comment, Feedback, Work, WorkListing};
use crate::domain::repository::{ChapterRepository, FeedbackRepository, WorkRepository};
use crate::domain::value_objects::ModerationStatus;
use crate::error::{WorksError, WorksResult};

#[derive(Default)]
struct Tables {
    works: HashMap<WorkId, Work>,
    chapters: HashMap<ChapterId, Chapter>,
    likes: HashSet<(ChapterId, UserId)>,
    comments: Vec<Comment>,
    feedback: Vec<Feedback>,
}

impl Tables {
    fn remove_chapter(&mut self, chapter_id: &ChapterId) -> bool {
        self.likes.retain(|(c, _)| c != chapter_id);
        self.comments.retain(|c| &c.chapter_id != chapter_id);
        self.chapters.remove(chapter_id).is_some()
    }

    fn like_count(&self, chapter_id: &ChapterId) -> i64 {
        self.likes.iter().filter(|(c, _)| c == chapter_id).count() as i64
    }
}

#[derive(Clone, Default)]
pub struct InMemoryWorksRepository {
    tables: Arc<RwLock<Tables>>,
    users: InMemoryAuthRepository,
}

impl InMemoryWorksRepository {
    /// Shares `users` for author names, like the `users` join in SQL.
    pub fn new(users: InMemoryAuthRepository) -> Self {
        Self {
            tables: Arc::default(),
            users,
        }
    }

    async fn with_author_name(&self, mut work: Work) -> WorksResult<Work> {
        let author = self
            .users
            .find_by_id(&work.author_id)
            .await
            .map_err(|e| WorksError::Internal(e.to_string()))?;
        if let Some(author) = author {
            work.author_name = author.user_name.into_inner();
        }
        Ok(work)
    }

    async fn with_author_names(&self, works: Vec<Work>) -> WorksResult<Vec<Work>> {
        let mut named = Vec::with_capacity(works.len());
        for work in works {
            named.push(self.with_author_name(work).await?);
        }
        Ok(named)
    }
}

// ============================================================================
// Work Repository Implementation
// ============================================================================

impl WorkRepository for InMemoryWorksRepository {
    async fn create_work(&self, work: &Work) -> WorksResult<()> {
        self.tables
            .write()
            .await
            .works
            .insert(work.work_id, work.clone());
        Ok(())
    }

    async fn find_work(&self, work_id: &WorkId) -> WorksResult<Option<Work>> {
        let work = self.tables.read().await.works.get(work_id).cloned();
        match work {
            Some(work) => self.with_author_name(work).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_published(&self) -> WorksResult<Vec<WorkListing>> {
        let (mut works, views) = {
            let tables = self.tables.read().await;
            let works: Vec<Work> = tables
                .works
                .values()
                .filter(|w| w.is_published())
                .cloned()
                .collect();
            let mut views: HashMap<WorkId, i64> = HashMap::new();
            for chapter in tables.chapters.values() {
                *views.entry(chapter.work_id).or_default() += chapter.views;
            }
            (works, views)
        };
        works.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(self
            .with_author_names(works)
            .await?
            .into_iter()
            .map(|work| WorkListing {
                total_views: views.get(&work.work_id).copied().unwrap_or(0),
                work,
            })
            .collect())
    }

    async fn list_by_author(&self, author_id: &UserId) -> WorksResult<Vec<Work>> {
        let mut works: Vec<Work> = self
            .tables
            .read()
            .await
            .works
            .values()
            .filter(|w| &w.author_id == author_id)
            .cloned()
            .collect();
        works.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.with_author_names(works).await
    }

    async fn list_by_moderation(
        &self,
        status: Option<ModerationStatus>,
    ) -> WorksResult<Vec<Work>> {
        let mut works: Vec<Work> = self
            .tables
            .read()
            .await
            .works
            .values()
            .filter(|w| status.is_none_or(|s| w.moderation_status() == s))
            .cloned()
            .collect();
        works.sort_by_key(|w| w.created_at);
        self.with_author_names(works).await
    }

    async fn update_work(&self, work: &Work) -> WorksResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.works.get_mut(&work.work_id) {
            existing.details = work.details.clone();
            existing.updated_at = work.updated_at;
        }
        Ok(())
    }

    async fn update_moderation(&self, work: &Work) -> WorksResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.works.get_mut(&work.work_id) {
            *existing = Work::from_parts(
                existing.work_id,
                existing.author_id,
                existing.author_name.clone(),
                existing.details.clone(),
                work.moderation_status(),
                existing.created_at,
                work.updated_at,
            );
        }
        Ok(())
    }

    async fn delete_work(&self, work_id: &WorkId) -> WorksResult<bool> {
        let mut tables = self.tables.write().await;
        let chapter_ids: Vec<ChapterId> = tables
            .chapters
            .values()
            .filter(|c| &c.work_id == work_id)
            .map(|c| c.chapter_id)
            .collect();
        for chapter_id in &chapter_ids {
            tables.remove_chapter(chapter_id);
        }
        Ok(tables.works.remove(work_id).is_some())
    }
}

// ============================================================================
// Chapter Repository Implementation
// ============================================================================

impl ChapterRepository for InMemoryWorksRepository {
    async fn create_chapter(&self, chapter: &Chapter) -> WorksResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .chapters
            .values()
            .any(|c| c.work_id == chapter.work_id && c.chapter_number == chapter.chapter_number)
        {
            return Err(WorksError::ChapterNumberTaken);
        }
        tables.chapters.insert(chapter.chapter_id, chapter.clone());
        Ok(())
    }

    async fn find_chapter(&self, chapter_id: &ChapterId) -> WorksResult<Option<Chapter>> {
        Ok(self.tables.read().await.chapters.get(chapter_id).cloned())
    }

    async fn list_chapters(&self, work_id: &WorkId) -> WorksResult<Vec<Chapter>> {
        let mut chapters: Vec<Chapter> = self
            .tables
            .read()
            .await
            .chapters
            .values()
            .filter(|c| &c.work_id == work_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.chapter_number);
        Ok(chapters)
    }

    async fn update_chapter(&self, chapter: &Chapter) -> WorksResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.chapters.get_mut(&chapter.chapter_id) {
            existing.title = chapter.title.clone();
            existing.content = chapter.content.clone();
            existing.updated_at = chapter.updated_at;
        }
        Ok(())
    }

    async fn delete_chapter(&self, chapter_id: &ChapterId) -> WorksResult<bool> {
        Ok(self.tables.write().await.remove_chapter(chapter_id))
    }

    async fn increment_views(&self, chapter_id: &ChapterId) -> WorksResult<Option<i64>> {
        let mut tables = self.tables.write().await;
        Ok(tables.chapters.get_mut(chapter_id).map(|c| {
            c.views += 1;
            c.views
        }))
    }

    async fn add_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64> {
        let mut tables = self.tables.write().await;
        tables.likes.insert((*chapter_id, *user_id));
        Ok(tables.like_count(chapter_id))
    }

    async fn remove_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64> {
        let mut tables = self.tables.write().await;
        tables.likes.remove(&(*chapter_id, *user_id));
        Ok(tables.like_count(chapter_id))
    }

    async fn like_count(&self, chapter_id: &ChapterId) -> WorksResult<i64> {
        Ok(self.tables.read().await.like_count(chapter_id))
    }

    async fn has_liked(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .contains(&(*chapter_id, *user_id)))
    }

    async fn add_comment(&self, comment: &Comment) -> WorksResult<()> {
        self.tables.write().await.comments.push(comment.clone());
        Ok(())
    }

    async fn list_comments(&self, chapter_id: &ChapterId) -> WorksResult<Vec<Comment>> {
        // Pushed in creation order
        Ok(self
            .tables
            .read()
            .await
            .comments
            .iter()
            .rev()
            .filter(|c| &c.chapter_id == chapter_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Feedback Repository Implementation
// ============================================================================

impl FeedbackRepository for InMemoryWorksRepository {
    async fn create_feedback(&self, feedback: &Feedback) -> WorksResult<()> {
        self.tables.write().await.feedback.push(feedback.clone());
        Ok(())
    }

    async fn list_feedback(&self) -> WorksResult<Vec<Feedback>> {
        Ok(self.tables.read().await.feedback.iter().rev().cloned().collect())
    }
}
