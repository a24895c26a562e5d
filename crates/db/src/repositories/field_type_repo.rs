//! Repository for the `field_types` table.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::PgPool;

use super::Conditions;
use crate::models::field_type::{CreateFieldType, FieldType, FieldTypeFilter};
use crate::store::{FieldTypeStore, StoreResult};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, validation, is_system, created_at, updated_at";

/// PostgreSQL-backed [`FieldTypeStore`].
pub struct FieldTypeRepo {
    pool: PgPool,
}

impl FieldTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &FieldTypeFilter) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.search(filter.search.as_deref(), &["name"]);
        conditions
    }
}

#[async_trait]
impl FieldTypeStore for FieldTypeRepo {
    async fn list(&self, filter: &FieldTypeFilter) -> StoreResult<Vec<FieldType>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM field_types {where_clause}
             ORDER BY name, id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let types = conditions
            .bind_all(sqlx::query_as::<_, FieldType>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(types)
    }

    async fn count(&self, filter: &FieldTypeFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!(
            "SELECT COUNT(*) FROM field_types {}",
            conditions.where_clause()
        );
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldType>> {
        let query = format!("SELECT {COLUMNS} FROM field_types WHERE id = $1");
        let field_type = sqlx::query_as::<_, FieldType>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(field_type)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<FieldType>> {
        let query = format!("SELECT {COLUMNS} FROM field_types WHERE name = $1");
        let field_type = sqlx::query_as::<_, FieldType>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(field_type)
    }

    async fn create(&self, input: &CreateFieldType) -> StoreResult<FieldType> {
        let query = format!(
            "INSERT INTO field_types (name, validation, is_system)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let field_type = sqlx::query_as::<_, FieldType>(&query)
            .bind(&input.name)
            .bind(&input.validation)
            .bind(input.is_system)
            .fetch_one(&self.pool)
            .await?;
        Ok(field_type)
    }
}
