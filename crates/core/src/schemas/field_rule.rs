//! Field rule schemas.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::double_option;
use crate::pagination::{default_limit, default_page, PageRequest, MAX_LIMIT, MAX_PAGE};
use crate::status::{RuleAction, RuleOperator};
use crate::types::DbId;

/// Body of `POST /api/field-rules`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_rule"))]
pub struct CreateFieldRuleInput {
    pub condition_field_id: DbId,
    pub operator: RuleOperator,
    #[validate(length(max = 500))]
    pub condition_value: Option<String>,
    pub action: RuleAction,
    pub target_field_id: DbId,
    pub project_id: Option<DbId>,
}

/// Body of `PUT /api/field-rules/{id}`.
///
/// Operator / value consistency can only be checked against the merged
/// rule, so the service re-validates after applying the patch.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFieldRuleInput {
    pub condition_field_id: Option<DbId>,
    pub operator: Option<RuleOperator>,
    #[serde(default, deserialize_with = "double_option")]
    pub condition_value: Option<Option<String>>,
    pub action: Option<RuleAction>,
    pub target_field_id: Option<DbId>,
    #[serde(default, deserialize_with = "double_option")]
    pub project_id: Option<Option<DbId>>,
}

/// Query string of `GET /api/field-rules`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FieldRuleListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[serde(rename = "projectId", alias = "project_id")]
    pub project_id: Option<DbId>,
    /// Matches rules where the field is either the condition or the target.
    #[serde(rename = "fieldId", alias = "field_id")]
    pub field_id: Option<DbId>,
}

impl FieldRuleListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl Default for FieldRuleListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            project_id: None,
            field_id: None,
        }
    }
}

fn validate_create_rule(input: &CreateFieldRuleInput) -> Result<(), ValidationError> {
    check_rule_shape(
        input.condition_field_id,
        input.target_field_id,
        input.operator,
        input.condition_value.as_deref(),
    )
}

/// Structural rules shared by create and (merged) update:
/// condition and target differ, and value-taking operators carry a value.
pub fn check_rule_shape(
    condition_field_id: DbId,
    target_field_id: DbId,
    operator: RuleOperator,
    condition_value: Option<&str>,
) -> Result<(), ValidationError> {
    if condition_field_id == target_field_id {
        let mut err = ValidationError::new("same_field");
        err.message = Some("condition and target must be different fields".into());
        return Err(err);
    }
    let has_value = condition_value.is_some_and(|v| !v.trim().is_empty());
    if !operator.is_value_less() && !has_value {
        let mut err = ValidationError::new("missing_value");
        err.message = Some(format!("operator {operator} requires a condition_value").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_input;

    fn rule(operator: &str, value: Option<&str>, target: DbId) -> CreateFieldRuleInput {
        serde_json::from_value(serde_json::json!({
            "condition_field_id": 1,
            "operator": operator,
            "condition_value": value,
            "action": "SHOW",
            "target_field_id": target,
        }))
        .unwrap()
    }

    #[test]
    fn value_required_for_comparisons() {
        assert!(validate_input(&rule("EQUALS", Some("High"), 2)).is_ok());
        let msg = validate_input(&rule("EQUALS", None, 2)).unwrap_err().to_string();
        assert!(msg.contains("operator EQUALS requires a condition_value"));
    }

    #[test]
    fn presence_operators_need_no_value() {
        assert!(validate_input(&rule("IS_EMPTY", None, 2)).is_ok());
    }

    #[test]
    fn condition_and_target_must_differ() {
        let msg = validate_input(&rule("IS_EMPTY", None, 1)).unwrap_err().to_string();
        assert!(msg.contains("condition and target must be different fields"));
    }
}
