//! Field rule entity model and DTOs.

use fieldhub_core::status::{RuleAction, RuleOperator};
use fieldhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `field_rules` table: when the condition field matches,
/// apply `action` to the target field.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FieldRule {
    pub id: DbId,
    pub condition_field_id: DbId,
    #[sqlx(try_from = "String")]
    pub operator: RuleOperator,
    pub condition_value: Option<String>,
    #[sqlx(try_from = "String")]
    pub action: RuleAction,
    pub target_field_id: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full set of writable rule columns, used for insert and for replacing a
/// rule after the service has merged a patch.
#[derive(Debug, Clone)]
pub struct FieldRuleData {
    pub condition_field_id: DbId,
    pub operator: RuleOperator,
    pub condition_value: Option<String>,
    pub action: RuleAction,
    pub target_field_id: DbId,
    pub project_id: Option<DbId>,
}

impl From<&FieldRule> for FieldRuleData {
    fn from(rule: &FieldRule) -> Self {
        Self {
            condition_field_id: rule.condition_field_id,
            operator: rule.operator,
            condition_value: rule.condition_value.clone(),
            action: rule.action,
            target_field_id: rule.target_field_id,
            project_id: rule.project_id,
        }
    }
}

/// List criteria for field rules.
#[derive(Debug, Clone, Default)]
pub struct FieldRuleFilter {
    pub project_id: Option<DbId>,
    /// Rules where this field is the condition or the target.
    pub field_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
