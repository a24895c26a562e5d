//! Handlers for the `/fields` resource.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field::{CreateFieldInput, FieldListQuery, UpdateFieldInput};
use fieldhub_db::models::field::{Field, FieldDetail};

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{created, ok, ApiJson, Message};
use crate::services::FieldService;
use crate::state::AppState;

/// GET /api/fields
pub async fn list_fields(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<FieldListQuery>,
) -> AppResult<ApiJson<Page<Field>>> {
    Ok(ok(FieldService::new(&state.stores).list(&query).await?))
}

/// GET /api/fields/{id}
///
/// Includes the rules in which the field is the condition or the target.
pub async fn get_field(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<FieldDetail>> {
    Ok(ok(FieldService::new(&state.stores).get_by_id(id).await?))
}

/// POST /api/fields
pub async fn create_field(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateFieldInput>,
) -> AppResult<ApiJson<Field>> {
    Ok(created(FieldService::new(&state.stores).create(input).await?))
}

/// PUT /api/fields/{id}
pub async fn update_field(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<UpdateFieldInput>,
) -> AppResult<ApiJson<Field>> {
    Ok(ok(FieldService::new(&state.stores).update(id, input).await?))
}

/// DELETE /api/fields/{id}
pub async fn delete_field(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Message>> {
    FieldService::new(&state.stores).delete(id).await?;
    Ok(ok(Message::new("Field deleted")))
}
