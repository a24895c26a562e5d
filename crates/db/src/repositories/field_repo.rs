//! Repository for the `fields` table.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::PgPool;

use super::{BindValue, Conditions};
use crate::models::field::{CreateField, Field, FieldFilter, UpdateField};
use crate::store::{FieldStore, StoreResult};

/// Column list shared across queries to avoid repetition. Qualified so the
/// rule-count subquery can refer to the outer row.
const COLUMNS: &str = "fields.id, fields.name, fields.description, fields.type_name, \
    fields.parent_id, fields.\"values\", fields.status, fields.is_required, \
    (SELECT COUNT(*) FROM field_rules fr \
     WHERE fr.condition_field_id = fields.id OR fr.target_field_id = fields.id) AS rule_count, \
    fields.created_at, fields.updated_at";

const HAS_RULES: &str = "EXISTS (SELECT 1 FROM field_rules fr \
    WHERE fr.condition_field_id = fields.id OR fr.target_field_id = fields.id)";

/// PostgreSQL-backed [`FieldStore`].
pub struct FieldRepo {
    pool: PgPool,
}

impl FieldRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &FieldFilter) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.search(
            filter.search.as_deref(),
            &["fields.name", "fields.description"],
        );
        if let Some(status) = filter.status {
            conditions.bind(
                "fields.status = {}",
                BindValue::Text(status.as_str().to_string()),
            );
        }
        if let Some(type_name) = &filter.type_name {
            conditions.bind("fields.type_name = {}", BindValue::Text(type_name.clone()));
        }
        match filter.has_rules {
            Some(true) => conditions.raw(HAS_RULES),
            Some(false) => conditions.raw(&format!("NOT {HAS_RULES}")),
            None => {}
        }
        match filter.has_values {
            Some(true) => conditions.raw("cardinality(fields.\"values\") > 0"),
            Some(false) => conditions.raw("cardinality(fields.\"values\") = 0"),
            None => {}
        }
        conditions
    }
}

#[async_trait]
impl FieldStore for FieldRepo {
    async fn list(&self, filter: &FieldFilter) -> StoreResult<Vec<Field>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM fields {where_clause}
             ORDER BY fields.name, fields.id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let fields = conditions
            .bind_all(sqlx::query_as::<_, Field>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(fields)
    }

    async fn count(&self, filter: &FieldFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!("SELECT COUNT(*) FROM fields {}", conditions.where_clause());
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Field>> {
        let query = format!("SELECT {COLUMNS} FROM fields WHERE fields.id = $1");
        let field = sqlx::query_as::<_, Field>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(field)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Field>> {
        let query = format!("SELECT {COLUMNS} FROM fields WHERE fields.name = $1");
        let field = sqlx::query_as::<_, Field>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(field)
    }

    async fn find_by_names(&self, names: &[String]) -> StoreResult<Vec<Field>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM fields WHERE fields.name = ANY($1)
             ORDER BY fields.name, fields.id"
        );
        let fields = sqlx::query_as::<_, Field>(&query)
            .bind(names)
            .fetch_all(&self.pool)
            .await?;
        Ok(fields)
    }

    async fn create(&self, input: &CreateField) -> StoreResult<Field> {
        let query = format!(
            "INSERT INTO fields (name, description, type_name, parent_id, \"values\", status, is_required)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let field = sqlx::query_as::<_, Field>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.type_name)
            .bind(input.parent_id)
            .bind(&input.values)
            .bind(input.status.as_str())
            .bind(input.is_required)
            .fetch_one(&self.pool)
            .await?;
        Ok(field)
    }

    async fn update(&self, id: DbId, input: &UpdateField) -> StoreResult<Option<Field>> {
        // $5 says whether parent_id was supplied at all; $6 may then be NULL.
        let query = format!(
            "UPDATE fields SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                type_name = COALESCE($4, type_name),
                parent_id = CASE WHEN $5 THEN $6 ELSE parent_id END,
                \"values\" = COALESCE($7, \"values\"),
                status = COALESCE($8, status),
                is_required = COALESCE($9, is_required),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let field = sqlx::query_as::<_, Field>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.type_name)
            .bind(input.parent_id.is_some())
            .bind(input.parent_id.flatten())
            .bind(&input.values)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.is_required)
            .fetch_optional(&self.pool)
            .await?;
        Ok(field)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        // Children are orphaned (ON DELETE SET NULL); rules and project
        // bindings cascade.
        let result = sqlx::query("DELETE FROM fields WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
