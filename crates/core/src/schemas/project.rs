//! Project and project-field schemas.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{double_option, trimmed, trimmed_option};
use crate::pagination::{default_limit, default_page, MAX_LIMIT, MAX_PAGE};
use crate::status::ProjectStatus;
use crate::types::Date;
use crate::validation::{check_date_range, not_blank};

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateProjectInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// Body of `PUT /api/projects/{id}`. Dates and description accept `null` to
/// clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProjectInput {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 2000))]
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<Date>>,
}

/// Query string of `GET /api/projects`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
}

super::list_query!(ProjectListQuery);

impl Default for ProjectListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One binding in `PUT /api/projects/{id}/fields`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectFieldInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub field_name: String,
    #[validate(length(max = 2000))]
    pub value: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub display_order: i32,
}

/// Body of `PUT /api/projects/{id}/fields`; replaces every binding.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetProjectFieldsInput {
    #[validate(length(max = 200), nested)]
    pub fields: Vec<ProjectFieldInput>,
}

fn validate_create_dates(input: &CreateProjectInput) -> Result<(), ValidationError> {
    check_date_range(input.start_date, input.end_date)
}

fn validate_update_dates(input: &UpdateProjectInput) -> Result<(), ValidationError> {
    check_date_range(input.start_date.flatten(), input.end_date.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_input;

    #[test]
    fn create_defaults_to_planning() {
        let input: CreateProjectInput =
            serde_json::from_value(serde_json::json!({ "name": "Apollo" })).unwrap();
        assert_eq!(input.status, ProjectStatus::Planning);
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn inverted_dates_rejected() {
        let input: CreateProjectInput = serde_json::from_value(serde_json::json!({
            "name": "Apollo",
            "start_date": "2026-05-01",
            "end_date": "2026-04-01",
        }))
        .unwrap();
        let msg = validate_input(&input).unwrap_err().to_string();
        assert!(msg.contains("start_date must not be after end_date"));
    }

    #[test]
    fn nested_field_errors_carry_their_index() {
        let input: SetProjectFieldsInput = serde_json::from_value(serde_json::json!({
            "fields": [
                { "field_name": "Priority" },
                { "field_name": "   " },
            ]
        }))
        .unwrap();
        assert!(input.fields[0].is_visible);
        let msg = validate_input(&input).unwrap_err().to_string();
        assert!(msg.contains("fields[1].field_name: must not be blank"), "{msg}");
    }

    #[test]
    fn binding_list_is_capped() {
        let fields: Vec<_> = (0..201)
            .map(|i| serde_json::json!({ "field_name": format!("f{i}") }))
            .collect();
        let input: SetProjectFieldsInput =
            serde_json::from_value(serde_json::json!({ "fields": fields })).unwrap();
        let msg = validate_input(&input).unwrap_err().to_string();
        assert!(msg.ends_with("fields: length must be at most 200"), "{msg}");
    }
}
