//! Handlers for the `/projects` resource and its field bindings.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::project::{
    CreateProjectInput, ProjectListQuery, SetProjectFieldsInput, UpdateProjectInput,
};
use fieldhub_db::models::project::{Project, ProjectDetail, ProjectField};

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{created, ok, ApiJson, Message};
use crate::services::ProjectService;
use crate::state::AppState;

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ProjectListQuery>,
) -> AppResult<ApiJson<Page<Project>>> {
    Ok(ok(ProjectService::new(&state.stores).list(&query).await?))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<ProjectDetail>> {
    Ok(ok(ProjectService::new(&state.stores).get_by_id(id).await?))
}

/// POST /api/projects
///
/// The authenticated user becomes the owner.
pub async fn create_project(
    current: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateProjectInput>,
) -> AppResult<ApiJson<Project>> {
    let project = ProjectService::new(&state.stores)
        .create(input, current.user_id)
        .await?;
    Ok(created(project))
}

/// PUT /api/projects/{id}
pub async fn update_project(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProjectInput>,
) -> AppResult<ApiJson<Project>> {
    Ok(ok(ProjectService::new(&state.stores).update(id, input).await?))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Message>> {
    ProjectService::new(&state.stores).delete(id).await?;
    Ok(ok(Message::new("Project deleted")))
}

/// GET /api/projects/{id}/fields
pub async fn get_project_fields(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Vec<ProjectField>>> {
    Ok(ok(ProjectService::new(&state.stores).fields(id).await?))
}

/// PUT /api/projects/{id}/fields
///
/// Replaces every binding of the project in one transaction.
pub async fn set_project_fields(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<SetProjectFieldsInput>,
) -> AppResult<ApiJson<Vec<ProjectField>>> {
    let fields = ProjectService::new(&state.stores)
        .set_fields(id, input)
        .await?;
    Ok(ok(fields))
}
