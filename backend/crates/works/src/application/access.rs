//! Resource loading behind the authorization engine
//!
//! Operations that need an identity fail with `Unauthenticated` before
//! anything is read, so anonymous callers learn nothing about existence.

use auth::policy::{self, Identity, Operation, Resource};
use kernel::id::{ChapterId, WorkId};

use crate::domain::entities::{Chapter, Work};
use crate::domain::repository::{ChapterRepository, WorkRepository};
use crate::error::{WorksError, WorksResult};

fn needs_identity(operation: Operation) -> bool {
    matches!(
        operation,
        Operation::Mutate | Operation::Like | Operation::Comment | Operation::Administer
    )
}

/// Load a work and check `operation` against it.
pub async fn authorized_work<R>(
    repo: &R,
    identity: &Identity,
    work_id: &WorkId,
    operation: Operation,
) -> WorksResult<Work>
where
    R: WorkRepository + Sync,
{
    if needs_identity(operation) {
        identity.require()?;
    }

    let work = repo
        .find_work(work_id)
        .await?
        .ok_or(WorksError::WorkNotFound)?;

    policy::authorize(identity, operation, Resource::Content(work.access()))?;
    Ok(work)
}

/// Load a chapter with its parent work and check `operation` against the work.
pub async fn authorized_chapter<R>(
    repo: &R,
    identity: &Identity,
    chapter_id: &ChapterId,
    operation: Operation,
) -> WorksResult<(Chapter, Work)>
where
    R: WorkRepository + ChapterRepository + Sync,
{
    if needs_identity(operation) {
        identity.require()?;
    }

    let chapter = repo
        .find_chapter(chapter_id)
        .await?
        .ok_or(WorksError::ChapterNotFound)?;
    let work = repo
        .find_work(&chapter.work_id)
        .await?
        .ok_or(WorksError::ChapterNotFound)?;

    policy::authorize(identity, operation, Resource::Content(work.access()))
        .map_err(|denial| WorksError::from_denial(denial, WorksError::ChapterNotFound))?;

    Ok((chapter, work))
}
