//! Admin user management handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::application::{CreateUserInput, ManageUsersUseCase, UpdateUserInput};
use crate::domain::policy::{self, AdminArea, Identity, Operation, Resource};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AdminUserResponse, CreateUserRequest, MessageResponse, UpdateUserRequest,
};
use crate::presentation::handlers::AuthAppState;
use crate::presentation::middleware::Caller;

fn authorize_user_admin(identity: &Identity) -> AuthResult<()> {
    policy::authorize(identity, Operation::Administer, Resource::Admin(AdminArea::Users))?;
    Ok(())
}

/// Unparseable ids cannot name a user.
fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse().map_err(|_| AuthError::UserNotFound)
}

/// GET /api/admin/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
) -> AuthResult<Json<Vec<AdminUserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.config.clone());
    let users = use_case.list(&identity).await?;
    Ok(Json(users.iter().map(AdminUserResponse::from).collect()))
}

/// POST /api/admin/users
pub async fn create_user<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<(StatusCode, Json<AdminUserResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case
        .create(
            &identity,
            CreateUserInput {
                user_name: req.username,
                password: req.password,
                role: req.role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AdminUserResponse::from(&user))))
}

/// PUT /api/admin/users/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<AdminUserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    // Authorize before revealing whether the id exists
    authorize_user_admin(&identity)?;
    let target = parse_user_id(&id)?;

    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case
        .update(
            &identity,
            target,
            UpdateUserInput {
                user_name: req.username,
                password: req.password,
                role: req.role,
            },
        )
        .await?;
    Ok(Json(AdminUserResponse::from(&user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    authorize_user_admin(&identity)?;
    let target = parse_user_id(&id)?;

    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(&identity, target).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
