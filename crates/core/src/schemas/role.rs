//! Role schemas.

use serde::Deserialize;
use validator::Validate;

use super::{double_option, trimmed, trimmed_option};
use crate::pagination::{default_limit, default_page, MAX_LIMIT, MAX_PAGE};
use crate::validation::{no_blank_entries, not_blank, HEX_COLOR};

/// Colour assigned to a role created without one.
pub const DEFAULT_ROLE_COLOR: &str = "#6B7280";

fn default_color() -> String {
    DEFAULT_ROLE_COLOR.to_string()
}

/// Body of `POST /api/roles`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 50), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    #[validate(regex(path = *HEX_COLOR))]
    pub color: String,
    #[serde(default)]
    #[validate(length(max = 100), custom(function = "no_blank_entries"))]
    pub permissions: Vec<String>,
}

/// Body of `PUT /api/roles/{id}`. `permissions`, when present, replaces the
/// role's permission set; `description: null` clears the description.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoleInput {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 2, max = 50), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub description: Option<Option<String>>,
    #[validate(regex(path = *HEX_COLOR))]
    pub color: Option<String>,
    #[validate(length(max = 100), custom(function = "no_blank_entries"))]
    pub permissions: Option<Vec<String>>,
}

/// Query string of `GET /api/roles`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

super::list_query!(RoleListQuery);

impl Default for RoleListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_input;

    #[test]
    fn colour_defaults_and_validates() {
        let input: CreateRoleInput =
            serde_json::from_value(serde_json::json!({ "name": "Editor" })).unwrap();
        assert_eq!(input.color, DEFAULT_ROLE_COLOR);
        assert!(input.permissions.is_empty());
        assert!(validate_input(&input).is_ok());

        let bad = CreateRoleInput {
            color: "blue".into(),
            ..input
        };
        let msg = validate_input(&bad).unwrap_err().to_string();
        assert!(msg.contains("color: has an invalid format"));
    }

    #[test]
    fn name_too_short() {
        let input: CreateRoleInput =
            serde_json::from_value(serde_json::json!({ "name": "X" })).unwrap();
        assert!(validate_input(&input).is_err());
    }
}
