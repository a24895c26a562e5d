//! Handlers for the `/field-rules` resource.

use axum::extract::State;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field_rule::{
    CreateFieldRuleInput, FieldRuleListQuery, UpdateFieldRuleInput,
};
use fieldhub_db::models::field_rule::FieldRule;

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{created, ok, ApiJson, Message};
use crate::services::FieldRuleService;
use crate::state::AppState;

/// GET /api/field-rules
pub async fn list_field_rules(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<FieldRuleListQuery>,
) -> AppResult<ApiJson<Page<FieldRule>>> {
    Ok(ok(FieldRuleService::new(&state.stores).list(&query).await?))
}

/// GET /api/field-rules/{id}
pub async fn get_field_rule(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<FieldRule>> {
    Ok(ok(FieldRuleService::new(&state.stores).get_by_id(id).await?))
}

/// POST /api/field-rules
pub async fn create_field_rule(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateFieldRuleInput>,
) -> AppResult<ApiJson<FieldRule>> {
    Ok(created(
        FieldRuleService::new(&state.stores).create(input).await?,
    ))
}

/// PUT /api/field-rules/{id}
pub async fn update_field_rule(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
    ValidatedJson(input): ValidatedJson<UpdateFieldRuleInput>,
) -> AppResult<ApiJson<FieldRule>> {
    Ok(ok(
        FieldRuleService::new(&state.stores).update(id, input).await?,
    ))
}

/// DELETE /api/field-rules/{id}
pub async fn delete_field_rule(
    State(state): State<AppState>,
    IdPath { id }: IdPath,
) -> AppResult<ApiJson<Message>> {
    FieldRuleService::new(&state.stores).delete(id).await?;
    Ok(ok(Message::new("Field rule deleted")))
}
