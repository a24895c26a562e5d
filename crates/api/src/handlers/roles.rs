//! Handlers for the `/roles` resource.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::role::{CreateRoleInput, RoleListQuery, UpdateRoleInput};
use fieldhub_db::models::role::Role;

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{created, ok, ApiJson, Message};
use crate::services::RoleService;
use crate::state::AppState;

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RoleListQuery>,
) -> AppResult<ApiJson<Page<Role>>> {
    Ok(ok(RoleService::new(&state.stores).list(&query).await?))
}

/// GET /api/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Role>> {
    Ok(ok(RoleService::new(&state.stores).get_by_id(id).await?))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateRoleInput>,
) -> AppResult<ApiJson<Role>> {
    Ok(created(RoleService::new(&state.stores).create(input).await?))
}

/// PUT /api/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<UpdateRoleInput>,
) -> AppResult<ApiJson<Role>> {
    Ok(ok(RoleService::new(&state.stores).update(id, input).await?))
}

/// DELETE /api/roles/{id}
///
/// Refused with `CONFLICT` while any user holds the role.
pub async fn delete_role(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Message>> {
    RoleService::new(&state.stores).delete(id).await?;
    Ok(ok(Message::new("Role deleted")))
}
