//! Works Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::application::config::WorksConfig;
use crate::domain::repository::ContentStore;
use crate::presentation::handlers::{self, WorksAppState};

/// Content routes, to be nested under `/api`.
///
/// Expects the session and CSRF layers from `auth::router::with_auth_layers`
/// on the assembled router; without them every caller is anonymous.
pub fn works_routes<R: ContentStore>(repo: Arc<R>, config: WorksConfig) -> Router {
    let state = WorksAppState {
        repo,
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/works",
            get(handlers::list_works::<R>).post(handlers::create_work::<R>),
        )
        .route("/works/my-works", get(handlers::my_works::<R>))
        .route(
            "/works/{id}",
            get(handlers::get_work::<R>)
                .put(handlers::update_work::<R>)
                .delete(handlers::delete_work::<R>),
        )
        .route(
            "/works/{id}/chapters",
            get(handlers::list_chapters::<R>).post(handlers::create_chapter::<R>),
        )
        .route(
            "/chapters/{id}",
            get(handlers::get_chapter::<R>)
                .put(handlers::update_chapter::<R>)
                .delete(handlers::delete_chapter::<R>),
        )
        .route("/chapters/{id}/view", post(handlers::record_view::<R>))
        .route(
            "/chapters/{id}/like",
            post(handlers::like_chapter::<R>).delete(handlers::unlike_chapter::<R>),
        )
        .route("/chapters/{id}/comments", post(handlers::add_comment::<R>))
        .route("/feedback", post(handlers::submit_feedback::<R>))
        .route("/admin/works", get(handlers::moderation_queue::<R>))
        .route(
            "/admin/works/{id}/moderation",
            patch(handlers::moderate_work::<R>),
        )
        .route("/admin/feedback", get(handlers::list_feedback::<R>))
        .with_state(state)
}
