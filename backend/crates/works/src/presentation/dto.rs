//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{ChapterDetail, ChapterInput, ChapterUpdateInput, WorkInput, WorkUpdateInput};
use crate::domain::entities::{Chapter, Comment, Feedback, Work, WorkListing};
use crate::domain::value_objects::{ChapterContent, ModerationStatus, WorkStatus, WorkType};

// ============================================================================
// Works
// ============================================================================

/// `isPublished` is not accepted: only moderation publishes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWorkRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<WorkStatus>,
    pub language: Option<String>,
    #[serde(default)]
    pub content_warnings: Vec<String>,
}

impl From<CreateWorkRequest> for WorkInput {
    fn from(req: CreateWorkRequest) -> Self {
        Self {
            title: req.title,
            work_type: req.work_type,
            description: req.description,
            cover_image_url: req.cover_image_url,
            genres: req.genres,
            tags: req.tags,
            status: req.status,
            language: req.language,
            content_warnings: req.content_warnings,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorkRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<WorkType>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<WorkStatus>,
    pub language: Option<String>,
    pub content_warnings: Option<Vec<String>>,
}

impl From<UpdateWorkRequest> for WorkUpdateInput {
    fn from(req: UpdateWorkRequest) -> Self {
        Self {
            title: req.title,
            work_type: req.work_type,
            description: req.description,
            cover_image_url: req.cover_image_url,
            genres: req.genres,
            tags: req.tags,
            status: req.status,
            language: req.language,
            content_warnings: req.content_warnings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub author: AuthorResponse,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub status: WorkStatus,
    pub language: Option<String>,
    pub content_warnings: Vec<String>,
    pub moderation_status: ModerationStatus,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Work> for WorkResponse {
    fn from(work: &Work) -> Self {
        let d = &work.details;
        Self {
            id: work.work_id.to_string(),
            title: d.title.clone(),
            work_type: d.work_type,
            description: d.description.clone(),
            cover_image_url: d.cover_image_url.clone(),
            author: AuthorResponse {
                id: work.author_id.to_string(),
                username: work.author_name.clone(),
            },
            genres: d.genres.clone(),
            tags: d.tags.clone(),
            status: d.status,
            language: d.language.clone(),
            content_warnings: d.content_warnings.clone(),
            moderation_status: work.moderation_status(),
            is_published: work.is_published(),
            created_at: work.created_at,
            updated_at: work.updated_at,
        }
    }
}

/// Public catalogue entry: the work plus total chapter views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkListingResponse {
    #[serde(flatten)]
    pub work: WorkResponse,
    pub views: i64,
}

impl From<&WorkListing> for WorkListingResponse {
    fn from(listing: &WorkListing) -> Self {
        Self {
            work: WorkResponse::from(&listing.work),
            views: listing.total_views,
        }
    }
}

// ============================================================================
// Chapters
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateChapterRequest {
    pub chapter_number: i32,
    pub title: String,
    pub content: ChapterContent,
}

impl From<CreateChapterRequest> for ChapterInput {
    fn from(req: CreateChapterRequest) -> Self {
        Self {
            chapter_number: req.chapter_number,
            title: req.title,
            content: req.content,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateChapterRequest {
    pub title: Option<String>,
    pub content: Option<ChapterContent>,
}

impl From<UpdateChapterRequest> for ChapterUpdateInput {
    fn from(req: UpdateChapterRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    pub id: String,
    pub work_id: String,
    pub chapter_number: i32,
    pub title: String,
    pub content: ChapterContent,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Chapter> for ChapterResponse {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.chapter_id.to_string(),
            work_id: chapter.work_id.to_string(),
            chapter_number: chapter.chapter_number,
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            views: chapter.views,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

/// Reader page payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDetailResponse {
    #[serde(flatten)]
    pub chapter: ChapterResponse,
    pub work_type: WorkType,
    pub likes_count: i64,
    pub liked_by_me: bool,
    pub comments: Vec<CommentResponse>,
}

impl From<&ChapterDetail> for ChapterDetailResponse {
    fn from(detail: &ChapterDetail) -> Self {
        Self {
            chapter: ChapterResponse::from(&detail.view.chapter),
            work_type: detail.work_type,
            likes_count: detail.view.likes,
            liked_by_me: detail.view.liked_by_caller,
            comments: detail.comments.iter().map(CommentResponse::from).collect(),
        }
    }
}

// ============================================================================
// Engagement
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ViewsResponse {
    pub views: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub likes_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.comment_id.to_string(),
            user_id: comment.user_id.to_string(),
            username: comment.user_name.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Moderation
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModerationRequest {
    pub moderation_status: ModerationStatus,
}

/// `?status=pending|published|rejected|all`, default `pending`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationQuery {
    pub status: Option<String>,
}

// ============================================================================
// Feedback
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Feedback> for FeedbackResponse {
    fn from(feedback: &Feedback) -> Self {
        Self {
            id: feedback.feedback_id.to_string(),
            name: feedback.name.clone(),
            email: feedback.email.to_string(),
            message: feedback.message.clone(),
            created_at: feedback.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
