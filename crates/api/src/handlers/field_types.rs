//! Handlers for the `/field-types` resource.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field_type::{CreateFieldTypeInput, FieldTypeListQuery};
use fieldhub_db::models::field_type::FieldType;

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{created, ok, ApiJson};
use crate::services::FieldTypeService;
use crate::state::AppState;

/// GET /api/field-types
pub async fn list_field_types(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<FieldTypeListQuery>,
) -> AppResult<ApiJson<Page<FieldType>>> {
    Ok(ok(FieldTypeService::new(&state.stores).list(&query).await?))
}

/// GET /api/field-types/{id}
pub async fn get_field_type(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<FieldType>> {
    Ok(ok(FieldTypeService::new(&state.stores).get_by_id(id).await?))
}

/// POST /api/field-types
pub async fn create_field_type(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateFieldTypeInput>,
) -> AppResult<ApiJson<FieldType>> {
    Ok(created(
        FieldTypeService::new(&state.stores).create(input).await?,
    ))
}
