//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use kernel::id::{ChapterId, UserId, WorkId};

use crate::domain::entities::{Chapter, Comment, Feedback, Work, WorkDetails, WorkListing};
use crate::domain::repository::{ChapterRepository, FeedbackRepository, WorkRepository};
use crate::domain::value_objects::{
    ChapterContent, Email, ModerationStatus, WorkStatus, WorkType,
};
use crate::error::{WorksError, WorksResult};

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgWorksRepository {
    pool: PgPool,
}

impl PgWorksRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Work columns joined with the author's current user name
const WORK_SELECT: &str = r#"
    SELECT
        w.work_id,
        w.author_id,
        u.user_name AS author_name,
        w.title,
        w.work_type,
        w.description,
        w.cover_image_url,
        w.genres,
        w.tags,
        w.work_status,
        w.language,
        w.content_warnings,
        w.moderation_status,
        w.created_at,
        w.updated_at
    FROM works w
    JOIN users u ON u.user_id = w.author_id
"#;

const CHAPTER_COLUMNS: &str = r#"
    chapter_id,
    work_id,
    chapter_number,
    title,
    content,
    views,
    created_at,
    updated_at
"#;

// ============================================================================
// Work Repository Implementation
// ============================================================================

impl WorkRepository for PgWorksRepository {
    async fn create_work(&self, work: &Work) -> WorksResult<()> {
        let d = &work.details;
        let status = work.moderation_status();

        sqlx::query(
            r#"
            INSERT INTO works (
                work_id,
                author_id,
                title,
                work_type,
                description,
                cover_image_url,
                genres,
                tags,
                work_status,
                language,
                content_warnings,
                moderation_status,
                is_published,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(work.work_id.as_uuid())
        .bind(work.author_id.as_uuid())
        .bind(&d.title)
        .bind(d.work_type.id())
        .bind(&d.description)
        .bind(&d.cover_image_url)
        .bind(&d.genres)
        .bind(&d.tags)
        .bind(d.status.id())
        .bind(&d.language)
        .bind(&d.content_warnings)
        .bind(status.id())
        .bind(status.is_published())
        .bind(work.created_at)
        .bind(work.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_work(&self, work_id: &WorkId) -> WorksResult<Option<Work>> {
        let row = sqlx::query_as::<_, WorkRow>(&format!("{WORK_SELECT} WHERE w.work_id = $1"))
            .bind(work_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkRow::into_work).transpose()
    }

    async fn list_published(&self) -> WorksResult<Vec<WorkListing>> {
        let rows = sqlx::query_as::<_, WorkListingRow>(&format!(
            r#"
            SELECT listed.*, COALESCE(v.total_views, 0)::BIGINT AS total_views
            FROM ({WORK_SELECT} WHERE w.is_published) AS listed
            LEFT JOIN (
                SELECT work_id, SUM(views) AS total_views
                FROM chapters
                GROUP BY work_id
            ) v ON v.work_id = listed.work_id
            ORDER BY listed.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(WorkListing {
                    work: row.work.into_work()?,
                    total_views: row.total_views,
                })
            })
            .collect()
    }

    async fn list_by_author(&self, author_id: &UserId) -> WorksResult<Vec<Work>> {
        let rows = sqlx::query_as::<_, WorkRow>(&format!(
            "{WORK_SELECT} WHERE w.author_id = $1 ORDER BY w.created_at DESC"
        ))
        .bind(author_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WorkRow::into_work).collect()
    }

    async fn list_by_moderation(
        &self,
        status: Option<ModerationStatus>,
    ) -> WorksResult<Vec<Work>> {
        let rows = sqlx::query_as::<_, WorkRow>(&format!(
            "{WORK_SELECT} WHERE ($1::SMALLINT IS NULL OR w.moderation_status = $1) \
             ORDER BY w.created_at ASC"
        ))
        .bind(status.map(|s| s.id()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WorkRow::into_work).collect()
    }

    async fn update_work(&self, work: &Work) -> WorksResult<()> {
        let d = &work.details;

        sqlx::query(
            r#"
            UPDATE works SET
                title = $2,
                work_type = $3,
                description = $4,
                cover_image_url = $5,
                genres = $6,
                tags = $7,
                work_status = $8,
                language = $9,
                content_warnings = $10,
                updated_at = $11
            WHERE work_id = $1
            "#,
        )
        .bind(work.work_id.as_uuid())
        .bind(&d.title)
        .bind(d.work_type.id())
        .bind(&d.description)
        .bind(&d.cover_image_url)
        .bind(&d.genres)
        .bind(&d.tags)
        .bind(d.status.id())
        .bind(&d.language)
        .bind(&d.content_warnings)
        .bind(work.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_moderation(&self, work: &Work) -> WorksResult<()> {
        let status = work.moderation_status();

        sqlx::query(
            r#"
            UPDATE works SET
                moderation_status = $2,
                is_published = $3,
                updated_at = $4
            WHERE work_id = $1
            "#,
        )
        .bind(work.work_id.as_uuid())
        .bind(status.id())
        .bind(status.is_published())
        .bind(work.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_work(&self, work_id: &WorkId) -> WorksResult<bool> {
        // Chapters, likes and comments go with it (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM works WHERE work_id = $1")
            .bind(work_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Chapter Repository Implementation
// ============================================================================

impl ChapterRepository for PgWorksRepository {
    async fn create_chapter(&self, chapter: &Chapter) -> WorksResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chapters (
                chapter_id,
                work_id,
                chapter_number,
                title,
                content,
                views,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(chapter.chapter_id.as_uuid())
        .bind(chapter.work_id.as_uuid())
        .bind(chapter.chapter_number)
        .bind(&chapter.title)
        .bind(Json(&chapter.content))
        .bind(chapter.views)
        .bind(chapter.created_at)
        .bind(chapter.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                WorksError::ChapterNumberTaken
            }
            _ => WorksError::Database(e),
        })?;

        Ok(())
    }

    async fn find_chapter(&self, chapter_id: &ChapterId) -> WorksResult<Option<Chapter>> {
        let row = sqlx::query_as::<_, ChapterRow>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE chapter_id = $1"
        ))
        .bind(chapter_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChapterRow::into_chapter))
    }

    async fn list_chapters(&self, work_id: &WorkId) -> WorksResult<Vec<Chapter>> {
        let rows = sqlx::query_as::<_, ChapterRow>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE work_id = $1 ORDER BY chapter_number ASC"
        ))
        .bind(work_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChapterRow::into_chapter).collect())
    }

    async fn update_chapter(&self, chapter: &Chapter) -> WorksResult<()> {
        sqlx::query(
            r#"
            UPDATE chapters SET
                title = $2,
                content = $3,
                updated_at = $4
            WHERE chapter_id = $1
            "#,
        )
        .bind(chapter.chapter_id.as_uuid())
        .bind(&chapter.title)
        .bind(Json(&chapter.content))
        .bind(chapter.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_chapter(&self, chapter_id: &ChapterId) -> WorksResult<bool> {
        let deleted = sqlx::query("DELETE FROM chapters WHERE chapter_id = $1")
            .bind(chapter_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn increment_views(&self, chapter_id: &ChapterId) -> WorksResult<Option<i64>> {
        let views = sqlx::query_scalar::<_, i64>(
            "UPDATE chapters SET views = views + 1 WHERE chapter_id = $1 RETURNING views",
        )
        .bind(chapter_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }

    async fn add_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64> {
        sqlx::query(
            r#"
            INSERT INTO chapter_likes (chapter_id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (chapter_id, user_id) DO NOTHING
            "#,
        )
        .bind(chapter_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?;

        self.like_count(chapter_id).await
    }

    async fn remove_like(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<i64> {
        sqlx::query("DELETE FROM chapter_likes WHERE chapter_id = $1 AND user_id = $2")
            .bind(chapter_id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        self.like_count(chapter_id).await
    }

    async fn like_count(&self, chapter_id: &ChapterId) -> WorksResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chapter_likes WHERE chapter_id = $1")
                .bind(chapter_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn has_liked(&self, chapter_id: &ChapterId, user_id: &UserId) -> WorksResult<bool> {
        let liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chapter_likes WHERE chapter_id = $1 AND user_id = $2)",
        )
        .bind(chapter_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }

    async fn add_comment(&self, comment: &Comment) -> WorksResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chapter_comments (
                comment_id,
                chapter_id,
                user_id,
                user_name,
                body,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.chapter_id.as_uuid())
        .bind(comment.user_id.as_uuid())
        .bind(&comment.user_name)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_comments(&self, chapter_id: &ChapterId) -> WorksResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, chapter_id, user_id, user_name, body, created_at
            FROM chapter_comments
            WHERE chapter_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(chapter_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }
}

// ============================================================================
// Feedback Repository Implementation
// ============================================================================

impl FeedbackRepository for PgWorksRepository {
    async fn create_feedback(&self, feedback: &Feedback) -> WorksResult<()> {
        sqlx::query(
            r#"
            INSERT INTO feedback (feedback_id, name, email, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(feedback.feedback_id.as_uuid())
        .bind(&feedback.name)
        .bind(feedback.email.as_str())
        .bind(&feedback.message)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_feedback(&self) -> WorksResult<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT feedback_id, name, email, message, created_at
            FROM feedback
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Feedback {
                feedback_id: row.feedback_id.into(),
                name: row.name,
                email: Email::from_db(row.email),
                message: row.message,
                created_at: row.created_at,
            })
            .collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct WorkRow {
    work_id: Uuid,
    author_id: Uuid,
    author_name: String,
    title: String,
    work_type: i16,
    description: String,
    cover_image_url: Option<String>,
    genres: Vec<String>,
    tags: Vec<String>,
    work_status: i16,
    language: Option<String>,
    content_warnings: Vec<String>,
    moderation_status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkRow {
    fn into_work(self) -> WorksResult<Work> {
        let work_type = WorkType::from_id(self.work_type)
            .ok_or_else(|| WorksError::Internal(format!("Invalid work_type: {}", self.work_type)))?;
        let status = WorkStatus::from_id(self.work_status).ok_or_else(|| {
            WorksError::Internal(format!("Invalid work_status: {}", self.work_status))
        })?;
        let moderation = ModerationStatus::from_id(self.moderation_status).ok_or_else(|| {
            WorksError::Internal(format!(
                "Invalid moderation_status: {}",
                self.moderation_status
            ))
        })?;

        Ok(Work::from_parts(
            WorkId::from(self.work_id),
            UserId::from(self.author_id),
            self.author_name,
            WorkDetails {
                title: self.title,
                work_type,
                description: self.description,
                cover_image_url: self.cover_image_url,
                genres: self.genres,
                tags: self.tags,
                status,
                language: self.language,
                content_warnings: self.content_warnings,
            },
            moderation,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct WorkListingRow {
    #[sqlx(flatten)]
    work: WorkRow,
    total_views: i64,
}

#[derive(sqlx::FromRow)]
struct ChapterRow {
    chapter_id: Uuid,
    work_id: Uuid,
    chapter_number: i32,
    title: String,
    content: Json<ChapterContent>,
    views: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChapterRow {
    fn into_chapter(self) -> Chapter {
        Chapter {
            chapter_id: ChapterId::from(self.chapter_id),
            work_id: WorkId::from(self.work_id),
            chapter_number: self.chapter_number,
            title: self.title,
            content: self.content.0,
            views: self.views,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    chapter_id: Uuid,
    user_id: Uuid,
    user_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: self.comment_id.into(),
            chapter_id: self.chapter_id.into(),
            user_id: self.user_id.into(),
            user_name: self.user_name,
            text: self.body,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    feedback_id: Uuid,
    name: String,
    email: String,
    message: String,
    created_at: DateTime<Utc>,
}
