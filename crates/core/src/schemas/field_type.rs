//! Field type schemas.

use serde::Deserialize;
use validator::Validate;

use crate::pagination::{default_limit, default_page, MAX_LIMIT, MAX_PAGE};
use crate::validation::IDENTIFIER;

/// Body of `POST /api/field-types`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFieldTypeInput {
    #[validate(length(min = 1, max = 50), regex(path = *IDENTIFIER))]
    pub name: String,
    /// Free-form validation descriptor interpreted by clients.
    pub validation: Option<serde_json::Value>,
    #[serde(default)]
    pub is_system: bool,
}

/// Query string of `GET /api/field-types`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FieldTypeListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

super::list_query!(FieldTypeListQuery);

impl Default for FieldTypeListQuery {
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
    fn name_must_be_identifier() {
        let ok: CreateFieldTypeInput =
            serde_json::from_value(serde_json::json!({ "name": "multi_select" })).unwrap();
        assert!(validate_input(&ok).is_ok());
        assert!(!ok.is_system);

        let bad: CreateFieldTypeInput =
            serde_json::from_value(serde_json::json!({ "name": "multi select" })).unwrap();
        assert!(validate_input(&bad).is_err());
    }
}
