//! Repository for the `projects` and `project_fields` tables.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::{BindValue, Conditions};
use crate::error::StoreError;
use crate::models::project::{
    CreateProject, CreateProjectField, Project, ProjectField, ProjectFilter, UpdateProject,
};
use crate::store::{ProjectStore, StoreResult};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, start_date, end_date, owner_id, \
                       created_at, updated_at";

/// Column list for `project_fields`.
const FIELD_COLUMNS: &str = "id, project_id, field_name, value, is_visible, is_required, \
                             display_order, created_at, updated_at";

/// PostgreSQL-backed [`ProjectStore`].
pub struct ProjectRepo {
    pool: PgPool,
}

impl ProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &ProjectFilter) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.search(filter.search.as_deref(), &["name", "description"]);
        if let Some(status) = filter.status {
            conditions.bind("status = {}", BindValue::Text(status.as_str().to_string()));
        }
        conditions
    }
}

async fn fetch_fields(
    conn: &mut PgConnection,
    project_id: DbId,
) -> Result<Vec<ProjectField>, sqlx::Error> {
    let query = format!(
        "SELECT {FIELD_COLUMNS} FROM project_fields
         WHERE project_id = $1
         ORDER BY display_order, id"
    );
    sqlx::query_as::<_, ProjectField>(&query)
        .bind(project_id)
        .fetch_all(conn)
        .await
}

#[async_trait]
impl ProjectStore for ProjectRepo {
    async fn list(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM projects {where_clause}
             ORDER BY name, id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let projects = conditions
            .bind_all(sqlx::query_as::<_, Project>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!("SELECT COUNT(*) FROM projects {}", conditions.where_clause());
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn create(&self, input: &CreateProject) -> StoreResult<Project> {
        let query = format!(
            "INSERT INTO projects (name, description, status, start_date, end_date, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    async fn update(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                start_date = CASE WHEN $6 THEN $7 ELSE start_date END,
                end_date = CASE WHEN $8 THEN $9 ELSE end_date END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.end_date.is_some())
            .bind(input.end_date.flatten())
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fields(&self, project_id: DbId) -> StoreResult<Vec<ProjectField>> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_fields(&mut conn, project_id).await?)
    }

    async fn replace_fields(
        &self,
        project_id: DbId,
        fields: &[CreateProjectField],
    ) -> StoreResult<Vec<ProjectField>> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::ForeignKeyViolation(
                "fk_project_fields_project".to_string(),
            ));
        }

        sqlx::query("DELETE FROM project_fields WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        for binding in fields {
            sqlx::query(
                "INSERT INTO project_fields
                    (project_id, field_name, value, is_visible, is_required, display_order)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(project_id)
            .bind(&binding.field_name)
            .bind(&binding.value)
            .bind(binding.is_visible)
            .bind(binding.is_required)
            .bind(binding.display_order)
            .execute(&mut *tx)
            .await?;
        }

        let bindings = fetch_fields(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(bindings)
    }
}
