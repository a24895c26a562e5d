//! Field schemas.

use serde::Deserialize;
use validator::Validate;

use super::{double_option, trimmed, trimmed_option};
use crate::pagination::{default_limit, default_page, MAX_LIMIT, MAX_PAGE};
use crate::status::FieldStatus;
use crate::types::DbId;
use crate::validation::{no_blank_entries, not_blank};

/// Body of `POST /api/fields`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFieldInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Name of an existing field type.
    #[serde(rename = "type", alias = "type_name")]
    #[validate(length(min = 1, max = 50))]
    pub type_name: String,
    pub parent_id: Option<DbId>,
    #[serde(default)]
    #[validate(length(max = 500), custom(function = "no_blank_entries"))]
    pub values: Vec<String>,
    #[serde(default)]
    pub status: FieldStatus,
    #[serde(default)]
    pub is_required: bool,
}

/// Body of `PUT /api/fields/{id}`. `parent_id: null` detaches the field
/// from its parent; omitting it leaves the parent unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFieldInput {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(rename = "type", alias = "type_name")]
    #[validate(length(min = 1, max = 50))]
    pub type_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
    #[validate(length(max = 500), custom(function = "no_blank_entries"))]
    pub values: Option<Vec<String>>,
    pub status: Option<FieldStatus>,
    pub is_required: Option<bool>,
}

/// Query string of `GET /api/fields`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FieldListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub status: Option<FieldStatus>,
    #[serde(rename = "type", alias = "type_name")]
    pub type_name: Option<String>,
    #[serde(rename = "hasRules", alias = "has_rules")]
    pub has_rules: Option<bool>,
    #[serde(rename = "hasValues", alias = "has_values")]
    pub has_values: Option<bool>,
}

super::list_query!(FieldListQuery);

impl Default for FieldListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
            type_name: None,
            has_rules: None,
            has_values: None,
        }
    }
}

/// Remove duplicate values, keeping the first occurrence of each.
pub fn dedup_values(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
