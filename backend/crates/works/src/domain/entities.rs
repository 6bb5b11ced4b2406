//! Domain Entities
//!
//! Works, their chapters, reader engagement and site feedback.

use auth::policy::ContentAccess;
use chrono::{DateTime, Utc};
use kernel::id::{ChapterId, CommentId, FeedbackId, UserId, WorkId};

use crate::domain::services::check_transition;
use crate::domain::value_objects::{
    ChapterContent, Email, ModerationStatus, WorkStatus, WorkType,
};
use crate::error::WorksResult;

// ============================================================================
// Work
// ============================================================================

/// Author-editable part of a work. Already cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDetails {
    pub title: String,
    pub work_type: WorkType,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub status: WorkStatus,
    pub language: Option<String>,
    pub content_warnings: Vec<String>,
}

/// Partial author update. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct WorkPatch {
    pub title: Option<String>,
    pub work_type: Option<WorkType>,
    pub description: Option<String>,
    /// `Some(None)` clears the cover
    pub cover_image_url: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<WorkStatus>,
    pub language: Option<Option<String>>,
    pub content_warnings: Option<Vec<String>>,
}

impl WorkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.work_type.is_none()
            && self.description.is_none()
            && self.cover_image_url.is_none()
            && self.genres.is_none()
            && self.tags.is_none()
            && self.status.is_none()
            && self.language.is_none()
            && self.content_warnings.is_none()
    }
}

/// Work entity
///
/// Public visibility is derived from the moderation status, which only
/// [`Work::moderate`] changes.
#[derive(Debug, Clone)]
pub struct Work {
    pub work_id: WorkId,
    pub author_id: UserId,
    /// Resolved from the credential store when read
    pub author_name: String,
    pub details: WorkDetails,
    moderation_status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Work {
    /// New works always start pending, whoever the author is.
    pub fn new(author_id: UserId, author_name: impl Into<String>, details: WorkDetails) -> Self {
        let now = Utc::now();

        Self {
            work_id: WorkId::new(),
            author_id,
            author_name: author_name.into(),
            details,
            moderation_status: ModerationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from storage
    pub fn from_parts(
        work_id: WorkId,
        author_id: UserId,
        author_name: String,
        details: WorkDetails,
        moderation_status: ModerationStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            work_id,
            author_id,
            author_name,
            details,
            moderation_status,
            created_at,
            updated_at,
        }
    }

    #[inline]
    pub fn moderation_status(&self) -> ModerationStatus {
        self.moderation_status
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.moderation_status.is_published()
    }

    /// Ownership and visibility, for the authorization engine.
    /// Chapters of this work share it.
    pub fn access(&self) -> ContentAccess {
        ContentAccess {
            owner: self.author_id,
            is_published: self.is_published(),
        }
    }

    /// Drive the moderation state machine.
    pub fn moderate(&mut self, to: ModerationStatus) -> WorksResult<()> {
        check_transition(self.moderation_status, to)?;
        self.moderation_status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn apply(&mut self, patch: WorkPatch) {
        let details = &mut self.details;
        if let Some(title) = patch.title {
            details.title = title;
        }
        if let Some(work_type) = patch.work_type {
            details.work_type = work_type;
        }
        if let Some(description) = patch.description {
            details.description = description;
        }
        if let Some(cover) = patch.cover_image_url {
            details.cover_image_url = cover;
        }
        if let Some(genres) = patch.genres {
            details.genres = genres;
        }
        if let Some(tags) = patch.tags {
            details.tags = tags;
        }
        if let Some(status) = patch.status {
            details.status = status;
        }
        if let Some(language) = patch.language {
            details.language = language;
        }
        if let Some(warnings) = patch.content_warnings {
            details.content_warnings = warnings;
        }
        self.updated_at = Utc::now();
    }
}

/// A published work with the summed views of its chapters
#[derive(Debug, Clone)]
pub struct WorkListing {
    pub work: Work,
    pub total_views: i64,
}

// ============================================================================
// Chapter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDraft {
    pub chapter_number: i32,
    pub title: String,
    pub content: ChapterContent,
}

/// Chapter entity. Visibility follows the parent work.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub chapter_id: ChapterId,
    pub work_id: WorkId,
    /// Unique within the work
    pub chapter_number: i32,
    pub title: String,
    pub content: ChapterContent,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chapter {
    pub fn new(work_id: WorkId, draft: ChapterDraft) -> Self {
        let now = Utc::now();

        Self {
            chapter_id: ChapterId::new(),
            work_id,
            chapter_number: draft.chapter_number,
            title: draft.title,
            content: draft.content,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The chapter number is fixed once created.
    pub fn revise(&mut self, title: Option<String>, content: Option<ChapterContent>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

/// Chapter with its like count and whether the caller likes it
#[derive(Debug, Clone)]
pub struct ChapterView {
    pub chapter: Chapter,
    pub likes: i64,
    pub liked_by_caller: bool,
}

// ============================================================================
// Engagement
// ============================================================================

#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub chapter_id: ChapterId,
    pub user_id: UserId,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        chapter_id: ChapterId,
        user_id: UserId,
        user_name: impl Into<String>,
        text: String,
    ) -> Self {
        Self {
            comment_id: CommentId::new(),
            chapter_id,
            user_id,
            user_name: user_name.into(),
            text,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Message sent through the public contact form
#[derive(Debug, Clone)]
pub struct Feedback {
    pub feedback_id: FeedbackId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(name: String, email: Email, message: String) -> Self {
        Self {
            feedback_id: FeedbackId::new(),
            name,
            email,
            message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorksError;

    pub(crate) fn details(title: &str) -> WorkDetails {
        WorkDetails {
            title: title.to_string(),
            work_type: WorkType::Novel,
            description: String::new(),
            cover_image_url: None,
            genres: vec![],
            tags: vec![],
            status: WorkStatus::Ongoing,
            language: None,
            content_warnings: vec![],
        }
    }

    #[test]
    fn test_new_work_is_pending_and_hidden() {
        let work = Work::new(UserId::new(), "alice", details("Dawn"));
        assert_eq!(work.moderation_status(), ModerationStatus::Pending);
        assert!(!work.is_published());
        assert!(!work.access().is_published);
        assert_eq!(work.access().owner, work.author_id);
    }

    #[test]
    fn test_moderation_keeps_visibility_consistent() {
        let mut work = Work::new(UserId::new(), "alice", details("Dawn"));

        work.moderate(ModerationStatus::Published).unwrap();
        assert!(work.is_published());

        work.moderate(ModerationStatus::Rejected).unwrap();
        assert!(!work.is_published());

        let err = work.moderate(ModerationStatus::Pending).unwrap_err();
        assert!(matches!(err, WorksError::InvalidTransition { .. }));
        assert_eq!(work.moderation_status(), ModerationStatus::Rejected);
    }

    #[test]
    fn test_patch_leaves_moderation_alone() {
        let mut work = Work::new(UserId::new(), "alice", details("Dawn"));
        let patch = WorkPatch {
            title: Some("Dusk".into()),
            cover_image_url: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        work.apply(patch);
        assert_eq!(work.details.title, "Dusk");
        assert_eq!(work.moderation_status(), ModerationStatus::Pending);
        assert!(WorkPatch::default().is_empty());
    }
}
