//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::{admin, middleware as auth_middleware};

/// Routes mounted under `/api/auth`
pub fn auth_routes<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/me", get(handlers::me))
        .route("/csrf-token", get(handlers::csrf_token::<R>))
        .route("/password", put(handlers::change_password::<R>))
        .with_state(state)
}

/// Routes mounted under `/api/admin`
pub fn admin_user_routes<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/users",
            get(admin::list_users::<R>).post(admin::create_user::<R>),
        )
        .route(
            "/users/{id}",
            put(admin::update_user::<R>).delete(admin::delete_user::<R>),
        )
        .with_state(state)
}

/// Wrap a fully assembled router with the session and CSRF middleware.
///
/// Apply once, on the outermost router, so the CSRF exemption sees full paths.
/// CSRF runs first, then session resolution.
pub fn with_auth_layers<R>(router: Router, state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let config = state.config.clone();
    router
        .layer(middleware::from_fn_with_state(
            state,
            auth_middleware::resolve_session::<R>,
        ))
        .layer(middleware::from_fn_with_state(
            config,
            auth_middleware::csrf_protect,
        ))
}

/// Auth and admin-user routes with middleware, mounted under `/api`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let router = Router::new()
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/admin", admin_user_routes(state.clone()));
    with_auth_layers(router, state)
}
