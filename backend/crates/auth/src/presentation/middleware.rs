//! Auth Middleware
//!
//! Request pipeline: [`csrf_protect`] (mutating methods only) runs first,
//! then [`resolve_session`] which always inserts an [`Identity`] into the
//! request extensions. Handlers read it back through [`Caller`].

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::{delete_cookie_header, extract_cookie};

use crate::application::ResolveSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::policy::Identity;
use crate::domain::repository::UserRepository;
use crate::domain::service::csrf::{csrf_tokens_match, requires_csrf_check};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

// ============================================================================
// CSRF
// ============================================================================

/// Double-submit check: the CSRF cookie must equal the CSRF header.
pub async fn csrf_protect(
    State(config): State<Arc<AuthConfig>>,
    req: Request,
    next: Next,
) -> Response {
    if requires_csrf_check(req.method()) && !config.is_csrf_exempt(req.uri().path()) {
        let headers = req.headers();
        let cookie_token = extract_cookie(headers, &config.csrf_cookie_name);
        let header_token = headers
            .get(config.csrf_header_name.as_str())
            .and_then(|v| v.to_str().ok());

        if !csrf_tokens_match(cookie_token.as_deref(), header_token) {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                has_cookie = cookie_token.is_some(),
                has_header = header_token.is_some(),
                "Rejected request without matching CSRF token"
            );
            return AuthError::CsrfMismatch.into_response();
        }
    }

    next.run(req).await
}

// ============================================================================
// Session
// ============================================================================

/// Session tokens carried by a request. Either may be absent.
struct SessionTokens {
    cookie: Option<String>,
    header: Option<String>,
}

impl SessionTokens {
    fn from_headers(headers: &HeaderMap, config: &AuthConfig) -> Self {
        let header = headers
            .get(config.legacy_token_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            cookie: extract_cookie(headers, &config.session_cookie_name),
            header,
        }
    }
}

/// Resolve the caller identity for every request.
///
/// The session cookie is tried first and the legacy header second, so a
/// stale cookie never hides a valid header token. Never rejects: an unusable
/// token just leaves the caller anonymous. A stale session cookie is cleared
/// on the way out unless the handler already set a fresh one.
pub async fn resolve_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let tokens = SessionTokens::from_headers(req.headers(), &state.config);
    let use_case = ResolveSessionUseCase::new(state.repo.clone(), state.config.clone());

    let mut resolution = match use_case.execute(tokens.cookie.as_deref()).await {
        Ok(resolution) => resolution,
        Err(e) => return e.into_response(),
    };
    let clear_cookie = resolution.stale && tokens.cookie.is_some();

    if resolution.identity == Identity::Anonymous {
        if let Some(token) = tokens.header.as_deref() {
            resolution = match use_case.execute(Some(token)).await {
                Ok(resolution) => resolution,
                Err(e) => return e.into_response(),
            };
        }
    }

    req.extensions_mut().insert(resolution.identity);

    let mut response = next.run(req).await;

    if clear_cookie && !sets_cookie(response.headers(), &state.config.session_cookie_name) {
        if let Some(value) = delete_cookie_header(&state.config.session_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split_once('=').is_some_and(|(n, _)| n.trim() == name))
}

// ============================================================================
// Extractor
// ============================================================================

/// Caller identity as resolved by [`resolve_session`].
///
/// Anonymous when the middleware did not run.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(
            parts.extensions.get::<Identity>().cloned().unwrap_or_default(),
        ))
    }
}
