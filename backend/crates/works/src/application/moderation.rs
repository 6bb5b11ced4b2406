//! Moderation Use Case
//!
//! Admin-only driver of the moderation state machine. This is the only
//! path that changes whether a work is publicly visible.

use std::sync::Arc;

use auth::policy::{self, AdminArea, Identity, Operation, Resource};
use kernel::id::WorkId;

use crate::domain::entities::Work;
use crate::domain::repository::WorkRepository;
use crate::domain::value_objects::ModerationStatus;
use crate::error::{WorksError, WorksResult};

pub struct ModerateWorksUseCase<R>
where
    R: WorkRepository,
{
    repo: Arc<R>,
}

impl<R> ModerateWorksUseCase<R>
where
    R: WorkRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn authorize_admin(identity: &Identity) -> WorksResult<()> {
        policy::authorize(
            identity,
            Operation::Administer,
            Resource::Admin(AdminArea::Moderation),
        )?;
        Ok(())
    }

    /// Works in `status`, oldest first. `None` lists every work.
    pub async fn queue(
        &self,
        identity: &Identity,
        status: Option<ModerationStatus>,
    ) -> WorksResult<Vec<Work>> {
        Self::authorize_admin(identity)?;
        self.repo.list_by_moderation(status).await
    }

    pub async fn moderate(
        &self,
        identity: &Identity,
        work_id: &WorkId,
        to: ModerationStatus,
    ) -> WorksResult<Work> {
        Self::authorize_admin(identity)?;

        let mut work = self
            .repo
            .find_work(work_id)
            .await?
            .ok_or(WorksError::WorkNotFound)?;

        let from = work.moderation_status();
        work.moderate(to)?;
        self.repo.update_moderation(&work).await?;

        tracing::info!(
            work_id = %work_id,
            %from,
            %to,
            moderated_by = ?identity.user_id(),
            "Work moderated"
        );
        Ok(work)
    }
}
