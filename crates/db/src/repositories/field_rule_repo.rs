//! Repository for the `field_rules` table.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::PgPool;

use super::{BindValue, Conditions};
use crate::models::field_rule::{FieldRule, FieldRuleData, FieldRuleFilter};
use crate::store::{FieldRuleStore, StoreResult};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, condition_field_id, operator, condition_value, action, \
                       target_field_id, project_id, created_at, updated_at";

/// PostgreSQL-backed [`FieldRuleStore`].
pub struct FieldRuleRepo {
    pool: PgPool,
}

impl FieldRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &FieldRuleFilter) -> Conditions {
        let mut conditions = Conditions::new();
        if let Some(project_id) = filter.project_id {
            conditions.bind("project_id = {}", BindValue::BigInt(project_id));
        }
        if let Some(field_id) = filter.field_id {
            conditions.bind(
                "(condition_field_id = {} OR target_field_id = {})",
                BindValue::BigInt(field_id),
            );
        }
        conditions
    }

    async fn list_where(&self, clause: &str, id: DbId) -> StoreResult<Vec<FieldRule>> {
        let query = format!("SELECT {COLUMNS} FROM field_rules WHERE {clause} ORDER BY id");
        let rules = sqlx::query_as::<_, FieldRule>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rules)
    }
}

#[async_trait]
impl FieldRuleStore for FieldRuleRepo {
    async fn list(&self, filter: &FieldRuleFilter) -> StoreResult<Vec<FieldRule>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM field_rules {where_clause}
             ORDER BY id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let rules = conditions
            .bind_all(sqlx::query_as::<_, FieldRule>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rules)
    }

    async fn count(&self, filter: &FieldRuleFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!(
            "SELECT COUNT(*) FROM field_rules {}",
            conditions.where_clause()
        );
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldRule>> {
        let query = format!("SELECT {COLUMNS} FROM field_rules WHERE id = $1");
        let rule = sqlx::query_as::<_, FieldRule>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rule)
    }

    async fn list_for_field(&self, field_id: DbId) -> StoreResult<Vec<FieldRule>> {
        self.list_where("condition_field_id = $1 OR target_field_id = $1", field_id)
            .await
    }

    async fn list_for_project(&self, project_id: DbId) -> StoreResult<Vec<FieldRule>> {
        self.list_where("project_id = $1", project_id).await
    }

    async fn create(&self, input: &FieldRuleData) -> StoreResult<FieldRule> {
        let query = format!(
            "INSERT INTO field_rules
                (condition_field_id, operator, condition_value, action, target_field_id, project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let rule = sqlx::query_as::<_, FieldRule>(&query)
            .bind(input.condition_field_id)
            .bind(input.operator.as_str())
            .bind(&input.condition_value)
            .bind(input.action.as_str())
            .bind(input.target_field_id)
            .bind(input.project_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(rule)
    }

    async fn replace(&self, id: DbId, input: &FieldRuleData) -> StoreResult<Option<FieldRule>> {
        let query = format!(
            "UPDATE field_rules SET
                condition_field_id = $2,
                operator = $3,
                condition_value = $4,
                action = $5,
                target_field_id = $6,
                project_id = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let rule = sqlx::query_as::<_, FieldRule>(&query)
            .bind(id)
            .bind(input.condition_field_id)
            .bind(input.operator.as_str())
            .bind(&input.condition_value)
            .bind(input.action.as_str())
            .bind(input.target_field_id)
            .bind(input.project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rule)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM field_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
