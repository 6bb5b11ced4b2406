//! Work Use Cases
//!
//! Authoring and public browsing of works. Moderation lives in
//! [`crate::application::moderation`].

use std::sync::Arc;

use auth::policy::{Identity, Operation};
use kernel::id::WorkId;

use crate::application::access::authorized_work;
use crate::application::config::WorksConfig;
use crate::domain::entities::{Work, WorkDetails, WorkListing, WorkPatch};
use crate::domain::repository::WorkRepository;
use crate::domain::services::{clean_http_url, clean_list, clean_optional_text, clean_text};
use crate::domain::value_objects::{WorkStatus, WorkType};
use crate::error::{WorksError, WorksResult};

/// Raw fields of a new work
#[derive(Debug, Clone)]
pub struct WorkInput {
    pub title: String,
    pub work_type: WorkType,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub status: Option<WorkStatus>,
    pub language: Option<String>,
    pub content_warnings: Vec<String>,
}

/// Raw partial update. An empty cover URL or language clears it.
#[derive(Debug, Clone, Default)]
pub struct WorkUpdateInput {
    pub title: Option<String>,
    pub work_type: Option<WorkType>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<WorkStatus>,
    pub language: Option<String>,
    pub content_warnings: Option<Vec<String>>,
}

pub struct ManageWorksUseCase<R>
where
    R: WorkRepository,
{
    repo: Arc<R>,
    config: Arc<WorksConfig>,
}

impl<R> ManageWorksUseCase<R>
where
    R: WorkRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<WorksConfig>) -> Self {
        Self { repo, config }
    }

    fn clean_cover(&self, url: Option<&str>) -> WorksResult<Option<String>> {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => clean_http_url("Cover image URL", url, self.config.url_max).map(Some),
            None => Ok(None),
        }
    }

    fn clean_details(&self, input: WorkInput) -> WorksResult<WorkDetails> {
        let c = &self.config;
        Ok(WorkDetails {
            title: clean_text("Title", &input.title, 1, c.work_title_max)?,
            work_type: input.work_type,
            description: clean_text(
                "Description",
                input.description.as_deref().unwrap_or_default(),
                0,
                c.description_max,
            )?,
            cover_image_url: self.clean_cover(input.cover_image_url.as_deref())?,
            genres: clean_list("Genre", &input.genres, c.list_max_items, c.label_max)?,
            tags: clean_list("Tag", &input.tags, c.list_max_items, c.label_max)?,
            status: input.status.unwrap_or(WorkStatus::Ongoing),
            language: clean_optional_text("Language", input.language.as_deref(), c.language_max)?,
            content_warnings: clean_list(
                "Content warning",
                &input.content_warnings,
                c.list_max_items,
                c.content_warning_max,
            )?,
        })
    }

    fn clean_patch(&self, input: WorkUpdateInput) -> WorksResult<WorkPatch> {
        let c = &self.config;
        let patch = WorkPatch {
            title: input
                .title
                .map(|t| clean_text("Title", &t, 1, c.work_title_max))
                .transpose()?,
            work_type: input.work_type,
            description: input
                .description
                .map(|d| clean_text("Description", &d, 0, c.description_max))
                .transpose()?,
            cover_image_url: input
                .cover_image_url
                .map(|u| self.clean_cover(Some(&u)))
                .transpose()?,
            genres: input
                .genres
                .map(|g| clean_list("Genre", &g, c.list_max_items, c.label_max))
                .transpose()?,
            tags: input
                .tags
                .map(|t| clean_list("Tag", &t, c.list_max_items, c.label_max))
                .transpose()?,
            status: input.status,
            language: input
                .language
                .map(|l| clean_optional_text("Language", Some(&l), c.language_max))
                .transpose()?,
            content_warnings: input
                .content_warnings
                .map(|w| {
                    clean_list(
                        "Content warning",
                        &w,
                        c.list_max_items,
                        c.content_warning_max,
                    )
                })
                .transpose()?,
        };

        if patch.is_empty() {
            return Err(WorksError::Validation(
                "At least one updatable field is required".into(),
            ));
        }
        Ok(patch)
    }

    /// New works start pending whatever the author's role.
    pub async fn create(&self, identity: &Identity, input: WorkInput) -> WorksResult<Work> {
        let author = identity.require()?;
        let details = self.clean_details(input)?;

        let work = Work::new(author.user_id, author.user_name.as_str(), details);
        self.repo.create_work(&work).await?;

        tracing::info!(work_id = %work.work_id, author_id = %work.author_id, "Work created");
        Ok(work)
    }

    pub async fn list_published(&self) -> WorksResult<Vec<WorkListing>> {
        self.repo.list_published().await
    }

    /// The caller's own works, whatever their moderation status
    pub async fn list_mine(&self, identity: &Identity) -> WorksResult<Vec<Work>> {
        let me = identity.require()?;
        self.repo.list_by_author(&me.user_id).await
    }

    pub async fn get(&self, identity: &Identity, work_id: &WorkId) -> WorksResult<Work> {
        authorized_work(self.repo.as_ref(), identity, work_id, Operation::Read).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        work_id: &WorkId,
        input: WorkUpdateInput,
    ) -> WorksResult<Work> {
        let mut work =
            authorized_work(self.repo.as_ref(), identity, work_id, Operation::Mutate).await?;

        work.apply(self.clean_patch(input)?);
        self.repo.update_work(&work).await?;

        tracing::info!(work_id = %work.work_id, updated_by = ?identity.user_id(), "Work updated");
        Ok(work)
    }

    /// Removes the work with its chapters, likes and comments.
    pub async fn delete(&self, identity: &Identity, work_id: &WorkId) -> WorksResult<()> {
        authorized_work(self.repo.as_ref(), identity, work_id, Operation::Mutate).await?;

        if !self.repo.delete_work(work_id).await? {
            return Err(WorksError::WorkNotFound);
        }

        tracing::info!(work_id = %work_id, deleted_by = ?identity.user_id(), "Work deleted");
        Ok(())
    }
}
