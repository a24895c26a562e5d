use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field_rule::{
    check_rule_shape, CreateFieldRuleInput, FieldRuleListQuery, UpdateFieldRuleInput,
};
use fieldhub_core::status::RuleOperator;
use fieldhub_core::types::DbId;
use fieldhub_db::models::field_rule::{FieldRule, FieldRuleData, FieldRuleFilter};
use fieldhub_db::store::{FieldRuleStore, FieldStore, ProjectStore};
use fieldhub_db::Stores;

use super::validation_message;

/// Conditional visibility / requirement rules between fields.
pub struct FieldRuleService {
    field_rules: Arc<dyn FieldRuleStore>,
    fields: Arc<dyn FieldStore>,
    projects: Arc<dyn ProjectStore>,
}

impl FieldRuleService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            field_rules: stores.field_rules.clone(),
            fields: stores.fields.clone(),
            projects: stores.projects.clone(),
        }
    }

    pub async fn list(&self, query: &FieldRuleListQuery) -> Result<Page<FieldRule>, CoreError> {
        let request = query.page_request();
        let filter = FieldRuleFilter {
            project_id: query.project_id,
            field_id: query.field_id,
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.field_rules.count(&filter).await?;
        let items = self.field_rules.list(&filter).await?;
        Ok(Page::new(items, request, total))
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<FieldRule, CoreError> {
        self.field_rules
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "FieldRule", id })
    }

    pub async fn create(&self, input: CreateFieldRuleInput) -> Result<FieldRule, CoreError> {
        let data = FieldRuleData {
            condition_field_id: input.condition_field_id,
            operator: input.operator,
            condition_value: normalize_value(input.operator, input.condition_value),
            action: input.action,
            target_field_id: input.target_field_id,
            project_id: input.project_id,
        };
        self.check_references(&data).await?;

        let rule = self.field_rules.create(&data).await?;
        tracing::info!(
            rule_id = rule.id,
            condition_field_id = rule.condition_field_id,
            target_field_id = rule.target_field_id,
            "Field rule created"
        );
        Ok(rule)
    }

    /// Merge the patch into the stored rule and re-validate the result.
    pub async fn update(&self, id: DbId, input: UpdateFieldRuleInput) -> Result<FieldRule, CoreError> {
        let existing = self.get_by_id(id).await?;
        let mut data = FieldRuleData::from(&existing);

        if let Some(condition_field_id) = input.condition_field_id {
            data.condition_field_id = condition_field_id;
        }
        if let Some(operator) = input.operator {
            data.operator = operator;
        }
        if let Some(condition_value) = input.condition_value {
            data.condition_value = condition_value;
        }
        if let Some(action) = input.action {
            data.action = action;
        }
        if let Some(target_field_id) = input.target_field_id {
            data.target_field_id = target_field_id;
        }
        if let Some(project_id) = input.project_id {
            data.project_id = project_id;
        }

        check_rule_shape(
            data.condition_field_id,
            data.target_field_id,
            data.operator,
            data.condition_value.as_deref(),
        )
        .map_err(|e| CoreError::Validation(validation_message(e)))?;
        data.condition_value = normalize_value(data.operator, data.condition_value);
        self.check_references(&data).await?;

        let rule = self
            .field_rules
            .replace(id, &data)
            .await?
            .ok_or(CoreError::NotFound { entity: "FieldRule", id })?;

        tracing::info!(rule_id = id, "Field rule updated");
        Ok(rule)
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.field_rules.delete(id).await? {
            return Err(CoreError::NotFound { entity: "FieldRule", id });
        }
        tracing::info!(rule_id = id, "Field rule deleted");
        Ok(())
    }

    async fn check_references(&self, data: &FieldRuleData) -> Result<(), CoreError> {
        for id in [data.condition_field_id, data.target_field_id] {
            if self.fields.find_by_id(id).await?.is_none() {
                return Err(CoreError::NotFound { entity: "Field", id });
            }
        }
        if let Some(id) = data.project_id {
            if self.projects.find_by_id(id).await?.is_none() {
                return Err(CoreError::NotFound { entity: "Project", id });
            }
        }
        Ok(())
    }
}

/// Presence operators never keep a value; other values are trimmed.
fn normalize_value(operator: RuleOperator, value: Option<String>) -> Option<String> {
    if operator.is_value_less() {
        return None;
    }
    value.map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_operators_drop_their_value() {
        assert_eq!(normalize_value(RuleOperator::IsEmpty, Some("x".into())), None);
        assert_eq!(
            normalize_value(RuleOperator::Equals, Some(" High ".into())),
            Some("High".into())
        );
    }
}
