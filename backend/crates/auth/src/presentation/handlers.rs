//! HTTP Handlers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};

use platform::client::client_ip_for_log;
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::service::csrf::generate_csrf_token;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, CredentialsRequest, CsrfTokenResponse, MessageResponse,
    SessionResponse,
};
use crate::presentation::middleware::Caller;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
///
/// Signs the new user in: sets the session cookie and a fresh CSRF cookie.
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    let session_cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.token.token);
    let csrf_cookie = state
        .config
        .csrf_cookie()
        .build_set_cookie(&generate_csrf_token());

    Ok((
        StatusCode::CREATED,
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, csrf_cookie),
        ]),
        Json(SessionResponse::from(&output.user)),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let direct_ip = connect_info.map(|Extension(ConnectInfo(addr))| addr.ip());
    let client_ip = client_ip_for_log(&headers, direct_ip);

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let result = use_case
        .execute(SignInInput {
            user_name: req.username,
            password: req.password,
        })
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            if matches!(
                e,
                AuthError::InvalidCredentials | AuthError::AccountLocked { .. }
            ) {
                tracing::warn!(client_ip = %client_ip, error = %e, "Login rejected");
            }
            return Err(e);
        }
    };

    let cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.token.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse::from(&output.user)),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Tokens are stateless; logging out only clears the cookie. Always 200.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(user_id) = identity.user_id() {
        tracing::info!(user_id = %user_id, "User signed out");
    }

    let cookie = state.config.session_cookie().build_delete_cookie();

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    )
}

// ============================================================================
// Me
// ============================================================================

/// GET /api/auth/me
pub async fn me(Caller(identity): Caller) -> AuthResult<Json<SessionResponse>> {
    let principal = identity.require()?;
    Ok(Json(SessionResponse {
        user: principal.clone(),
    }))
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /api/auth/csrf-token
///
/// Returns the current CSRF token, issuing a cookie first if none exists.
pub async fn csrf_token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(existing) = extract_cookie(&headers, &state.config.csrf_cookie_name) {
        return Json(CsrfTokenResponse {
            csrf_token: existing,
        })
        .into_response();
    }

    let token = generate_csrf_token();
    let cookie = state.config.csrf_cookie().build_set_cookie(&token);

    (
        [(header::SET_COOKIE, cookie)],
        Json(CsrfTokenResponse { csrf_token: token }),
    )
        .into_response()
}

// ============================================================================
// Password
// ============================================================================

/// PUT /api/auth/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(
            &identity,
            ChangePasswordInput {
                target: None,
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}
