//! Unauthenticated listings mounted under `/api/test` in development only.

use axum::extract::State;
use fieldhub_core::pagination::{Page, MAX_LIMIT};
use fieldhub_core::schemas::role::RoleListQuery;
use fieldhub_core::schemas::user::UserListQuery;
use fieldhub_db::models::role::Role;
use fieldhub_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::response::{ok, ApiJson};
use crate::services::{RoleService, UserService};
use crate::state::AppState;

/// GET /api/test/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiJson<Page<UserResponse>>> {
    let query = UserListQuery {
        limit: MAX_LIMIT,
        ..UserListQuery::default()
    };
    Ok(ok(UserService::new(&state.stores).list(&query).await?))
}

/// GET /api/test/roles
pub async fn list_roles(State(state): State<AppState>) -> AppResult<ApiJson<Page<Role>>> {
    let query = RoleListQuery {
        limit: MAX_LIMIT,
        ..RoleListQuery::default()
    };
    Ok(ok(RoleService::new(&state.stores).list(&query).await?))
}
