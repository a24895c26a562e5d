//! Handlers for the `/users` resource.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::user::{
    CreateUserInput, ManageRolesInput, UpdateUserInput, UserListQuery,
};
use fieldhub_db::models::user::{RoleSummary, UserResponse};

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{created, ok, ApiJson, Message};
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserListQuery>,
) -> AppResult<ApiJson<Page<UserResponse>>> {
    let page = UserService::new(&state.stores).list(&query).await?;
    Ok(ok(page))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<UserResponse>> {
    let user = UserService::new(&state.stores).get_by_id(id).await?;
    Ok(ok(user))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserInput>,
) -> AppResult<ApiJson<UserResponse>> {
    let user = UserService::new(&state.stores).create(input).await?;
    Ok(created(user))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUserInput>,
) -> AppResult<ApiJson<UserResponse>> {
    let user = UserService::new(&state.stores).update(id, input).await?;
    Ok(ok(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    current: AuthUser,
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Message>> {
    UserService::new(&state.stores)
        .delete(id, current.user_id)
        .await?;
    Ok(ok(Message::new("User deleted")))
}

/// GET /api/users/{id}/roles
pub async fn get_user_roles(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Vec<RoleSummary>>> {
    let roles = UserService::new(&state.stores).roles(id).await?;
    Ok(ok(roles))
}

/// POST /api/users/{id}/roles
pub async fn manage_user_roles(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<ManageRolesInput>,
) -> AppResult<ApiJson<Vec<RoleSummary>>> {
    let roles = UserService::new(&state.stores)
        .manage_roles(id, input)
        .await?;
    Ok(ok(roles))
}
