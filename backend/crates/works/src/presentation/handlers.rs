//! HTTP Handlers
//!
//! Handlers take the caller from the session layer and hand it to the use
//! cases, which consult the authorization engine. Operations that need a
//! signed-in caller check that before parsing path ids, so anonymous
//! callers get 401 regardless of the target.

use std::sync::Arc;

use auth::Caller;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use kernel::id::{ChapterId, WorkId};

use crate::application::config::WorksConfig;
use crate::application::{
    EngagementUseCase, FeedbackInput, FeedbackUseCase, ManageChaptersUseCase,
    ManageWorksUseCase, ModerateWorksUseCase,
};
use crate::domain::repository::ContentStore;
use crate::domain::value_objects::ModerationStatus;
use crate::error::{WorksError, WorksResult};
use crate::presentation::dto::{
    ChapterDetailResponse, ChapterResponse, CommentRequest, CommentResponse,
    CreateChapterRequest, CreateWorkRequest, FeedbackRequest, FeedbackResponse, LikesResponse,
    MessageResponse, ModerationQuery, ModerationRequest, UpdateChapterRequest,
    UpdateWorkRequest, ViewsResponse, WorkListingResponse, WorkResponse,
};

/// Shared state for content handlers
#[derive(Clone)]
pub struct WorksAppState<R>
where
    R: ContentStore,
{
    pub repo: Arc<R>,
    pub config: Arc<WorksConfig>,
}

/// Unparseable ids cannot name a work.
fn parse_work_id(raw: &str) -> WorksResult<WorkId> {
    raw.parse().map_err(|_| WorksError::WorkNotFound)
}

fn parse_chapter_id(raw: &str) -> WorksResult<ChapterId> {
    raw.parse().map_err(|_| WorksError::ChapterNotFound)
}

// ============================================================================
// Works
// ============================================================================

/// GET /api/works
pub async fn list_works<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
) -> WorksResult<Json<Vec<WorkListingResponse>>> {
    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    let listings = use_case.list_published().await?;
    Ok(Json(listings.iter().map(WorkListingResponse::from).collect()))
}

/// POST /api/works
pub async fn create_work<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Json(req): Json<CreateWorkRequest>,
) -> WorksResult<(StatusCode, Json<WorkResponse>)> {
    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    let work = use_case.create(&identity, req.into()).await?;
    Ok((StatusCode::CREATED, Json(WorkResponse::from(&work))))
}

/// GET /api/works/my-works
pub async fn my_works<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
) -> WorksResult<Json<Vec<WorkResponse>>> {
    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    let works = use_case.list_mine(&identity).await?;
    Ok(Json(works.iter().map(WorkResponse::from).collect()))
}

/// GET /api/works/{id}
pub async fn get_work<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<WorkResponse>> {
    let work_id = parse_work_id(&id)?;
    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    let work = use_case.get(&identity, &work_id).await?;
    Ok(Json(WorkResponse::from(&work)))
}

/// PUT /api/works/{id}
pub async fn update_work<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<UpdateWorkRequest>,
) -> WorksResult<Json<WorkResponse>> {
    identity.require()?;
    let work_id = parse_work_id(&id)?;

    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    let work = use_case.update(&identity, &work_id, req.into()).await?;
    Ok(Json(WorkResponse::from(&work)))
}

/// DELETE /api/works/{id}
pub async fn delete_work<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<MessageResponse>> {
    identity.require()?;
    let work_id = parse_work_id(&id)?;

    let use_case = ManageWorksUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(&identity, &work_id).await?;
    Ok(Json(MessageResponse::new("Work removed")))
}

// ============================================================================
// Chapters
// ============================================================================

/// GET /api/works/{id}/chapters
pub async fn list_chapters<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<Vec<ChapterResponse>>> {
    let work_id = parse_work_id(&id)?;
    let use_case = ManageChaptersUseCase::new(state.repo.clone(), state.config.clone());
    let chapters = use_case.list(&identity, &work_id).await?;
    Ok(Json(chapters.iter().map(ChapterResponse::from).collect()))
}

/// POST /api/works/{id}/chapters
pub async fn create_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<CreateChapterRequest>,
) -> WorksResult<(StatusCode, Json<ChapterResponse>)> {
    identity.require()?;
    let work_id = parse_work_id(&id)?;

    let use_case = ManageChaptersUseCase::new(state.repo.clone(), state.config.clone());
    let chapter = use_case.create(&identity, &work_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ChapterResponse::from(&chapter))))
}

/// GET /api/chapters/{id}
pub async fn get_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<ChapterDetailResponse>> {
    let chapter_id = parse_chapter_id(&id)?;
    let use_case = ManageChaptersUseCase::new(state.repo.clone(), state.config.clone());
    let detail = use_case.get(&identity, &chapter_id).await?;
    Ok(Json(ChapterDetailResponse::from(&detail)))
}

/// PUT /api/chapters/{id}
pub async fn update_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<UpdateChapterRequest>,
) -> WorksResult<Json<ChapterResponse>> {
    identity.require()?;
    let chapter_id = parse_chapter_id(&id)?;

    let use_case = ManageChaptersUseCase::new(state.repo.clone(), state.config.clone());
    let chapter = use_case.update(&identity, &chapter_id, req.into()).await?;
    Ok(Json(ChapterResponse::from(&chapter)))
}

/// DELETE /api/chapters/{id}
pub async fn delete_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<MessageResponse>> {
    identity.require()?;
    let chapter_id = parse_chapter_id(&id)?;

    let use_case = ManageChaptersUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(&identity, &chapter_id).await?;
    Ok(Json(MessageResponse::new("Chapter removed")))
}

// ============================================================================
// Engagement
// ============================================================================

/// POST /api/chapters/{id}/view
pub async fn record_view<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<ViewsResponse>> {
    let chapter_id = parse_chapter_id(&id)?;
    let use_case = EngagementUseCase::new(state.repo.clone(), state.config.clone());
    let views = use_case.record_view(&identity, &chapter_id).await?;
    Ok(Json(ViewsResponse { views }))
}

/// POST /api/chapters/{id}/like
pub async fn like_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<LikesResponse>> {
    identity.require()?;
    let chapter_id = parse_chapter_id(&id)?;

    let use_case = EngagementUseCase::new(state.repo.clone(), state.config.clone());
    let likes_count = use_case.like(&identity, &chapter_id).await?;
    Ok(Json(LikesResponse { likes_count }))
}

/// DELETE /api/chapters/{id}/like
pub async fn unlike_chapter<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> WorksResult<Json<LikesResponse>> {
    identity.require()?;
    let chapter_id = parse_chapter_id(&id)?;

    let use_case = EngagementUseCase::new(state.repo.clone(), state.config.clone());
    let likes_count = use_case.unlike(&identity, &chapter_id).await?;
    Ok(Json(LikesResponse { likes_count }))
}

/// POST /api/chapters/{id}/comments
///
/// Responds with all comments of the chapter, newest first.
pub async fn add_comment<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> WorksResult<(StatusCode, Json<Vec<CommentResponse>>)> {
    identity.require()?;
    let chapter_id = parse_chapter_id(&id)?;

    let use_case = EngagementUseCase::new(state.repo.clone(), state.config.clone());
    let comments = use_case.comment(&identity, &chapter_id, &req.text).await?;
    Ok((
        StatusCode::CREATED,
        Json(comments.iter().map(CommentResponse::from).collect()),
    ))
}

// ============================================================================
// Moderation
// ============================================================================

/// GET /api/admin/works?status=
pub async fn moderation_queue<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Query(query): Query<ModerationQuery>,
) -> WorksResult<Json<Vec<WorkResponse>>> {
    let status = match query.status.as_deref() {
        None | Some("") => Some(ModerationStatus::Pending),
        Some("all") => None,
        Some(code) => Some(ModerationStatus::from_code(code).ok_or_else(|| {
            WorksError::Validation(
                "Status must be one of pending, published, rejected, all".into(),
            )
        })?),
    };

    let use_case = ModerateWorksUseCase::new(state.repo.clone());
    let works = use_case.queue(&identity, status).await?;
    Ok(Json(works.iter().map(WorkResponse::from).collect()))
}

/// PATCH /api/admin/works/{id}/moderation
pub async fn moderate_work<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<ModerationRequest>,
) -> WorksResult<Json<WorkResponse>> {
    ModerateWorksUseCase::<R>::authorize_admin(&identity)?;
    let work_id = parse_work_id(&id)?;

    let use_case = ModerateWorksUseCase::new(state.repo.clone());
    let work = use_case
        .moderate(&identity, &work_id, req.moderation_status)
        .await?;
    Ok(Json(WorkResponse::from(&work)))
}

// ============================================================================
// Feedback
// ============================================================================

/// POST /api/feedback
pub async fn submit_feedback<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Json(req): Json<FeedbackRequest>,
) -> WorksResult<(StatusCode, Json<FeedbackResponse>)> {
    let use_case = FeedbackUseCase::new(state.repo.clone(), state.config.clone());
    let feedback = use_case
        .submit(FeedbackInput {
            name: req.name,
            email: req.email,
            message: req.message,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(&feedback))))
}

/// GET /api/admin/feedback
pub async fn list_feedback<R: ContentStore>(
    State(state): State<WorksAppState<R>>,
    Caller(identity): Caller,
) -> WorksResult<Json<Vec<FeedbackResponse>>> {
    let use_case = FeedbackUseCase::new(state.repo.clone(), state.config.clone());
    let feedback = use_case.list(&identity).await?;
    Ok(Json(feedback.iter().map(FeedbackResponse::from).collect()))
}
