//! Use case and HTTP scenario tests for the works crate

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use auth::application::{ManageUsersUseCase, SignUpInput, SignUpUseCase};
    use auth::domain::repository::UserRepository;
    use auth::models::user_name::UserName;
    use auth::{AuthConfig, Identity, InMemoryAuthRepository, Principal};
    use chrono::Utc;

    use crate::application::config::WorksConfig;
    use crate::application::{ChapterInput, WorkInput};
    use crate::domain::value_objects::{ChapterContent, WorkType};
    use crate::infra::InMemoryWorksRepository;

    pub struct Fixture {
        pub users: Arc<InMemoryAuthRepository>,
        pub repo: Arc<InMemoryWorksRepository>,
        pub auth_config: Arc<AuthConfig>,
        pub config: Arc<WorksConfig>,
    }

    /// Signed-in caller with a session token
    pub struct Account {
        pub identity: Identity,
        pub token: String,
    }

    impl Fixture {
        pub fn new() -> Self {
            let users = InMemoryAuthRepository::new();
            Self {
                repo: Arc::new(InMemoryWorksRepository::new(users.clone())),
                users: Arc::new(users),
                auth_config: Arc::new(AuthConfig::testing()),
                config: Arc::new(WorksConfig::default()),
            }
        }

        pub async fn user(&self, name: &str) -> Account {
            let output = SignUpUseCase::new(self.users.clone(), self.auth_config.clone())
                .execute(SignUpInput {
                    user_name: name.to_string(),
                    password: "password123".to_string(),
                })
                .await
                .unwrap();

            Account {
                identity: Identity::User(Principal {
                    user_id: output.user.user_id,
                    user_name: output.user.user_name.clone(),
                    role: output.user.user_role,
                }),
                token: output.token.token,
            }
        }

        pub async fn admin(&self, name: &str) -> Account {
            ManageUsersUseCase::new(self.users.clone(), self.auth_config.clone())
                .ensure_admin(name, "password123".to_string())
                .await
                .unwrap();
            let user = self
                .users
                .find_by_user_name(&UserName::new(name).unwrap())
                .await
                .unwrap()
                .unwrap();

            Account {
                identity: Identity::User(Principal {
                    user_id: user.user_id,
                    user_name: user.user_name.clone(),
                    role: user.user_role,
                }),
                token: self
                    .auth_config
                    .token_codec()
                    .issue(user.user_id, Utc::now())
                    .token,
            }
        }
    }

    pub fn work_input(title: &str) -> WorkInput {
        WorkInput {
            title: title.to_string(),
            work_type: WorkType::Novel,
            description: Some("A long night.".to_string()),
            cover_image_url: None,
            genres: vec!["fantasy".to_string()],
            tags: vec![],
            status: None,
            language: Some("en".to_string()),
            content_warnings: vec![],
        }
    }

    pub fn chapter_input(number: i32) -> ChapterInput {
        ChapterInput {
            chapter_number: number,
            title: format!("Chapter {number}"),
            content: ChapterContent::Text("It begins.".to_string()),
        }
    }
}

#[cfg(test)]
mod work_tests {
    use auth::Identity;

    use super::support::*;
    use crate::application::{
        ManageChaptersUseCase, ManageWorksUseCase, ModerateWorksUseCase, WorkUpdateInput,
    };
    use crate::domain::repository::ChapterRepository;
    use crate::domain::value_objects::{ModerationStatus, WorkStatus};
    use crate::error::WorksError;

    #[tokio::test]
    async fn test_new_work_is_pending_and_hidden_from_strangers() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        assert_eq!(work.moderation_status(), ModerationStatus::Pending);
        assert!(!work.is_published());
        assert_eq!(work.author_name, "alice");

        for stranger in [&Identity::Anonymous, &bob.identity] {
            assert!(matches!(
                works.get(stranger, &work.work_id).await,
                Err(WorksError::WorkNotFound)
            ));
        }
        assert!(works.get(&alice.identity, &work.work_id).await.is_ok());
        assert!(works.get(&admin.identity, &work.work_id).await.is_ok());

        assert!(works.list_published().await.unwrap().is_empty());
        assert_eq!(works.list_mine(&alice.identity).await.unwrap().len(), 1);
        assert!(works.list_mine(&bob.identity).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_authored_work_also_starts_pending() {
        let fx = Fixture::new();
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&admin.identity, work_input("Notice")).await.unwrap();
        assert_eq!(work.moderation_status(), ModerationStatus::Pending);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create() {
        let fx = Fixture::new();
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());

        assert!(matches!(
            works.create(&Identity::Anonymous, work_input("Dawn")).await,
            Err(WorksError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_may_update() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();

        let rename = |title: &str| WorkUpdateInput {
            title: Some(title.to_string()),
            ..Default::default()
        };

        // Hidden work, but the mutation rule answers first
        assert!(matches!(
            works.update(&bob.identity, &work.work_id, rename("Mine")).await,
            Err(WorksError::Forbidden)
        ));
        assert!(matches!(
            works.update(&Identity::Anonymous, &work.work_id, rename("Mine")).await,
            Err(WorksError::Unauthenticated)
        ));

        let updated = works
            .update(&alice.identity, &work.work_id, rename("Dusk"))
            .await
            .unwrap();
        assert_eq!(updated.details.title, "Dusk");

        let updated = works
            .update(
                &admin.identity,
                &work.work_id,
                WorkUpdateInput {
                    status: Some(WorkStatus::Hiatus),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.details.status, WorkStatus::Hiatus);
        assert_eq!(updated.details.title, "Dusk");
    }

    #[tokio::test]
    async fn test_update_validation() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();

        assert!(matches!(
            works
                .update(&alice.identity, &work.work_id, WorkUpdateInput::default())
                .await,
            Err(WorksError::Validation(_))
        ));
        assert!(matches!(
            works
                .update(
                    &alice.identity,
                    &work.work_id,
                    WorkUpdateInput {
                        cover_image_url: Some("javascript:alert(1)".to_string()),
                        ..Default::default()
                    },
                )
                .await,
            Err(WorksError::Validation(_))
        ));

        let mut input = work_input("<b>Loud</b>");
        input.genres.clear();
        assert!(matches!(
            works.create(&alice.identity, input).await,
            Err(WorksError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_chapters() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        let chapter = chapters
            .create(&alice.identity, &work.work_id, chapter_input(1))
            .await
            .unwrap();

        assert!(matches!(
            works.delete(&bob.identity, &work.work_id).await,
            Err(WorksError::Forbidden)
        ));

        works.delete(&alice.identity, &work.work_id).await.unwrap();
        assert!(matches!(
            works.get(&alice.identity, &work.work_id).await,
            Err(WorksError::WorkNotFound)
        ));
        assert!(fx.repo.find_chapter(&chapter.chapter_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_published_listing_sums_chapter_views() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        for number in 1..=2 {
            let chapter = chapters
                .create(&alice.identity, &work.work_id, chapter_input(number))
                .await
                .unwrap();
            fx.repo.increment_views(&chapter.chapter_id).await.unwrap();
        }
        ModerateWorksUseCase::new(fx.repo.clone())
            .moderate(&admin.identity, &work.work_id, ModerationStatus::Published)
            .await
            .unwrap();

        let listed = works.list_published().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].total_views, 2);
        assert_eq!(listed[0].work.author_name, "alice");
    }
}

#[cfg(test)]
mod chapter_tests {
    use auth::Identity;

    use super::support::*;
    use crate::application::{
        ChapterUpdateInput, EngagementUseCase, ManageChaptersUseCase, ManageWorksUseCase,
        ModerateWorksUseCase,
    };
    use crate::domain::value_objects::{ChapterContent, ModerationStatus};
    use crate::error::WorksError;

    #[tokio::test]
    async fn test_chapters_inherit_work_visibility() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        let chapter = chapters
            .create(&alice.identity, &work.work_id, chapter_input(1))
            .await
            .unwrap();

        assert!(matches!(
            chapters.get(&bob.identity, &chapter.chapter_id).await,
            Err(WorksError::ChapterNotFound)
        ));
        assert!(matches!(
            chapters.list(&Identity::Anonymous, &work.work_id).await,
            Err(WorksError::WorkNotFound)
        ));
        assert!(chapters.get(&alice.identity, &chapter.chapter_id).await.is_ok());

        ModerateWorksUseCase::new(fx.repo.clone())
            .moderate(&admin.identity, &work.work_id, ModerationStatus::Published)
            .await
            .unwrap();

        let detail = chapters
            .get(&Identity::Anonymous, &chapter.chapter_id)
            .await
            .unwrap();
        assert_eq!(detail.view.chapter.title, "Chapter 1");
        assert!(!detail.view.liked_by_caller);
        assert_eq!(
            chapters
                .list(&Identity::Anonymous, &work.work_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_chapter_mutations_follow_the_parent_work() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        assert!(matches!(
            chapters
                .create(&bob.identity, &work.work_id, chapter_input(1))
                .await,
            Err(WorksError::Forbidden)
        ));

        let chapter = chapters
            .create(&alice.identity, &work.work_id, chapter_input(1))
            .await
            .unwrap();
        assert!(matches!(
            chapters
                .create(&alice.identity, &work.work_id, chapter_input(1))
                .await,
            Err(WorksError::ChapterNumberTaken)
        ));

        let edit = ChapterUpdateInput {
            content: Some(ChapterContent::Images(vec![
                "https://cdn.example.com/p1.png".to_string(),
            ])),
            ..Default::default()
        };
        assert!(matches!(
            chapters
                .update(&bob.identity, &chapter.chapter_id, edit.clone())
                .await,
            Err(WorksError::Forbidden)
        ));
        let updated = chapters
            .update(&alice.identity, &chapter.chapter_id, edit)
            .await
            .unwrap();
        assert!(matches!(updated.content, ChapterContent::Images(ref p) if p.len() == 1));
        assert_eq!(updated.title, "Chapter 1");

        assert!(matches!(
            chapters.delete(&Identity::Anonymous, &chapter.chapter_id).await,
            Err(WorksError::Unauthenticated)
        ));
        chapters
            .delete(&alice.identity, &chapter.chapter_id)
            .await
            .unwrap();
        assert!(matches!(
            chapters.get(&alice.identity, &chapter.chapter_id).await,
            Err(WorksError::ChapterNotFound)
        ));
    }

    #[tokio::test]
    async fn test_chapter_input_validation() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());
        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();

        assert!(matches!(
            chapters
                .create(&alice.identity, &work.work_id, chapter_input(0))
                .await,
            Err(WorksError::Validation(_))
        ));

        let mut empty = chapter_input(2);
        empty.content = ChapterContent::Images(vec![]);
        assert!(matches!(
            chapters.create(&alice.identity, &work.work_id, empty).await,
            Err(WorksError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_engagement() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let chapters = ManageChaptersUseCase::new(fx.repo.clone(), fx.config.clone());
        let engagement = EngagementUseCase::new(fx.repo.clone(), fx.config.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        let chapter = chapters
            .create(&alice.identity, &work.work_id, chapter_input(1))
            .await
            .unwrap();
        let id = chapter.chapter_id;

        // Hidden: strangers cannot engage or even learn it exists
        assert!(matches!(
            engagement.like(&bob.identity, &id).await,
            Err(WorksError::ChapterNotFound)
        ));
        assert!(matches!(
            engagement.record_view(&Identity::Anonymous, &id).await,
            Err(WorksError::ChapterNotFound)
        ));

        ModerateWorksUseCase::new(fx.repo.clone())
            .moderate(&admin.identity, &work.work_id, ModerationStatus::Published)
            .await
            .unwrap();

        assert_eq!(engagement.record_view(&Identity::Anonymous, &id).await.unwrap(), 1);
        assert_eq!(engagement.record_view(&bob.identity, &id).await.unwrap(), 2);

        assert!(matches!(
            engagement.like(&Identity::Anonymous, &id).await,
            Err(WorksError::Unauthenticated)
        ));
        assert_eq!(engagement.like(&bob.identity, &id).await.unwrap(), 1);
        assert_eq!(engagement.like(&bob.identity, &id).await.unwrap(), 1);
        assert_eq!(engagement.like(&alice.identity, &id).await.unwrap(), 2);
        assert_eq!(engagement.unlike(&bob.identity, &id).await.unwrap(), 1);
        assert_eq!(engagement.unlike(&bob.identity, &id).await.unwrap(), 1);

        engagement.comment(&bob.identity, &id, "First!").await.unwrap();
        let comments = engagement
            .comment(&alice.identity, &id, "  Thanks  ")
            .await
            .unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "Thanks");
        assert_eq!(comments[0].user_name, "alice");
        assert_eq!(comments[1].text, "First!");

        assert!(matches!(
            engagement.comment(&bob.identity, &id, "   ").await,
            Err(WorksError::Validation(_))
        ));

        let detail = chapters.get(&alice.identity, &id).await.unwrap();
        assert_eq!(detail.view.likes, 1);
        assert!(detail.view.liked_by_caller);
        assert_eq!(detail.view.chapter.views, 2);
        assert_eq!(detail.comments.len(), 2);
    }
}

#[cfg(test)]
mod moderation_tests {
    use auth::Identity;

    use super::support::*;
    use crate::application::{ManageWorksUseCase, ModerateWorksUseCase};
    use crate::domain::value_objects::ModerationStatus::*;
    use crate::error::WorksError;

    #[tokio::test]
    async fn test_state_machine_drives_visibility() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let moderation = ModerateWorksUseCase::new(fx.repo.clone());

        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();
        let id = work.work_id;

        let rejected = moderation.moderate(&admin.identity, &id, Rejected).await.unwrap();
        assert!(!rejected.is_published());

        let published = moderation.moderate(&admin.identity, &id, Published).await.unwrap();
        assert!(published.is_published());
        assert!(works.get(&Identity::Anonymous, &id).await.is_ok());

        assert!(matches!(
            moderation.moderate(&admin.identity, &id, Pending).await,
            Err(WorksError::InvalidTransition { .. })
        ));
        assert!(matches!(
            moderation.moderate(&admin.identity, &id, Published).await,
            Err(WorksError::InvalidTransition { .. })
        ));

        moderation.moderate(&admin.identity, &id, Rejected).await.unwrap();
        assert!(matches!(
            works.get(&Identity::Anonymous, &id).await,
            Err(WorksError::WorkNotFound)
        ));
    }

    #[tokio::test]
    async fn test_only_admins_moderate() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let moderation = ModerateWorksUseCase::new(fx.repo.clone());
        let work = works.create(&alice.identity, work_input("Dawn")).await.unwrap();

        // Not even the author
        assert!(matches!(
            moderation
                .moderate(&alice.identity, &work.work_id, Published)
                .await,
            Err(WorksError::Forbidden)
        ));
        assert!(matches!(
            moderation.queue(&Identity::Anonymous, None).await,
            Err(WorksError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_queue_filters_by_status() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let admin = fx.admin("root").await;
        let works = ManageWorksUseCase::new(fx.repo.clone(), fx.config.clone());
        let moderation = ModerateWorksUseCase::new(fx.repo.clone());

        let first = works.create(&alice.identity, work_input("One")).await.unwrap();
        works.create(&alice.identity, work_input("Two")).await.unwrap();
        moderation
            .moderate(&admin.identity, &first.work_id, Published)
            .await
            .unwrap();

        let pending = moderation.queue(&admin.identity, Some(Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].details.title, "Two");
        assert_eq!(moderation.queue(&admin.identity, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_work() {
        let fx = Fixture::new();
        let admin = fx.admin("root").await;
        let moderation = ModerateWorksUseCase::new(fx.repo.clone());

        assert!(matches!(
            moderation
                .moderate(&admin.identity, &kernel::id::WorkId::new(), Published)
                .await,
            Err(WorksError::WorkNotFound)
        ));
    }
}

#[cfg(test)]
mod feedback_tests {
    use auth::Identity;

    use super::support::*;
    use crate::application::{FeedbackInput, FeedbackUseCase};
    use crate::error::WorksError;

    fn input(email: &str) -> FeedbackInput {
        FeedbackInput {
            name: "Reader".to_string(),
            email: email.to_string(),
            message: "Love the site".to_string(),
        }
    }

    #[tokio::test]
    async fn test_anyone_submits_only_admins_read() {
        let fx = Fixture::new();
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let feedback = FeedbackUseCase::new(fx.repo.clone(), fx.config.clone());

        let saved = feedback.submit(input("Reader@Example.com")).await.unwrap();
        assert_eq!(saved.email.as_str(), "reader@example.com");

        assert!(matches!(
            feedback.submit(input("not-an-email")).await,
            Err(WorksError::Validation(_))
        ));

        assert!(matches!(
            feedback.list(&bob.identity).await,
            Err(WorksError::Forbidden)
        ));
        assert!(matches!(
            feedback.list(&Identity::Anonymous).await,
            Err(WorksError::Unauthenticated)
        ));
        assert_eq!(feedback.list(&admin.identity).await.unwrap().len(), 1);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use auth::AuthAppState;
    use auth::router::{admin_user_routes, auth_routes, with_auth_layers};

    use super::support::*;
    use crate::application::config::WorksConfig;
    use crate::presentation::works_routes;

    const CSRF: &str = "test-csrf-token";

    fn app(fx: &Fixture) -> Router {
        let auth_state = AuthAppState {
            repo: fx.users.clone(),
            config: fx.auth_config.clone(),
        };
        let router = Router::new()
            .nest("/api/auth", auth_routes(auth_state.clone()))
            .nest("/api/admin", admin_user_routes(auth_state.clone()))
            .nest("/api", works_routes(fx.repo.clone(), WorksConfig::default()));
        with_auth_layers(router, auth_state)
    }

    fn session(token: &str) -> String {
        format!("session={token}")
    }

    fn send(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
        let mut cookies = format!("_csrf={CSRF}");
        if let Some(token) = token {
            cookies.push_str("; ");
            cookies.push_str(&session(token));
        }
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookies)
            .header("x-csrf-token", CSRF)
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let builder = Request::builder().uri(uri);
        let builder = match token {
            Some(token) => builder.header(header::COOKIE, session(token)),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    fn new_work() -> Value {
        json!({
            "title": "Dawn",
            "type": "novel",
            "description": "A long night.",
            "genres": ["fantasy"],
        })
    }

    #[tokio::test]
    async fn test_pending_work_hidden_until_admin_approves() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let admin = fx.admin("root").await;
        let app = app(&fx);

        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(new_work()), Some(&alice.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["moderationStatus"], "pending");
        assert_eq!(body["isPublished"], false);
        assert_eq!(body["author"]["username"], "alice");
        let id = body["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/works/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/works/{id}"), Some(&alice.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(send(
                "PATCH",
                &format!("/api/admin/works/{id}/moderation"),
                Some(json!({"moderationStatus": "published"})),
                Some(&admin.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["isPublished"], true);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/works/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/api/works", None)).await.unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["views"], 0);
    }

    #[tokio::test]
    async fn test_create_without_csrf_header_is_rejected() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/works")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, session(&alice.token))
            .body(Body::from(new_work().to_string()))
            .unwrap();

        let response = app(&fx).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "CSRF_MISMATCH");
    }

    #[tokio::test]
    async fn test_authors_cannot_publish_themselves() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let app = app(&fx);

        let mut body = new_work();
        body["isPublished"] = json!(true);
        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(body), Some(&alice.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(new_work()), Some(&alice.token)))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(send(
                "PATCH",
                &format!("/api/admin/works/{id}/moderation"),
                Some(json!({"moderationStatus": "published"})),
                Some(&alice.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_status_codes_for_callers() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let app = app(&fx);

        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(new_work()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(new_work()), Some(&alice.token)))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let update = json!({"title": "Mine now"});
        let response = app
            .clone()
            .oneshot(send("PUT", &format!("/api/works/{id}"), Some(update.clone()), Some(&bob.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(send("PUT", "/api/works/not-a-uuid", Some(update), Some(&bob.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(send("DELETE", "/api/works/not-a-uuid", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(send(
                "PATCH",
                &format!("/api/admin/works/{id}/moderation"),
                Some(json!({"moderationStatus": "pending"})),
                Some(&admin.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

        let response = app
            .oneshot(get("/api/admin/works?status=bogus", Some(&admin.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chapter_engagement_over_http() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        let admin = fx.admin("root").await;
        let app = app(&fx);

        let response = app
            .clone()
            .oneshot(send("POST", "/api/works", Some(new_work()), Some(&alice.token)))
            .await
            .unwrap();
        let work_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/api/works/{work_id}/chapters"),
                Some(json!({"chapterNumber": 1, "title": "Night", "content": "It begins."})),
                Some(&alice.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let chapter_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/chapters/{chapter_id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        app.clone()
            .oneshot(send(
                "PATCH",
                &format!("/api/admin/works/{work_id}/moderation"),
                Some(json!({"moderationStatus": "published"})),
                Some(&admin.token),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(send("POST", &format!("/api/chapters/{chapter_id}/view"), None, None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["views"], 1);

        let response = app
            .clone()
            .oneshot(send("POST", &format!("/api/chapters/{chapter_id}/like"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/api/chapters/{chapter_id}/like"),
                None,
                Some(&bob.token),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["likesCount"], 1);

        let response = app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/api/chapters/{chapter_id}/comments"),
                Some(json!({"text": "Great start"})),
                Some(&bob.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await[0]["username"], "bob");

        let response = app
            .oneshot(get(&format!("/api/chapters/{chapter_id}"), Some(&bob.token)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["content"], "It begins.");
        assert_eq!(body["workType"], "novel");
        assert_eq!(body["likesCount"], 1);
        assert_eq!(body["likedByMe"], true);
        assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_feedback_round() {
        let fx = Fixture::new();
        let admin = fx.admin("root").await;
        let app = app(&fx);

        let response = app
            .clone()
            .oneshot(send(
                "POST",
                "/api/feedback",
                Some(json!({"name": "Reader", "email": "reader@example.com", "message": "Hi"})),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.clone().oneshot(get("/api/admin/feedback", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get("/api/admin/feedback", Some(&admin.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }
}
