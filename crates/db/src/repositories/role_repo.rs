//! Repository for the `roles` and `role_permissions` tables.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::Conditions;
use crate::models::role::{CreateRole, Role, RoleDeletion, RoleFilter, UpdateRole};
use crate::store::{RoleStore, StoreResult};

/// Column list shared across queries to avoid repetition. Permissions and
/// the user count are derived from the join tables.
const COLUMNS: &str = "id, name, description, color, \
    ARRAY(SELECT rp.permission FROM role_permissions rp \
          WHERE rp.role_id = roles.id ORDER BY rp.permission) AS permissions, \
    (SELECT COUNT(*) FROM user_roles ur WHERE ur.role_id = roles.id) AS user_count, \
    created_at, updated_at";

/// PostgreSQL-backed [`RoleStore`].
pub struct RoleRepo {
    pool: PgPool,
}

impl RoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &RoleFilter) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.search(filter.search.as_deref(), &["name", "description"]);
        conditions
    }
}

async fn fetch_role(conn: &mut PgConnection, id: DbId) -> Result<Option<Role>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
    sqlx::query_as::<_, Role>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Replace the permission set of a role.
async fn set_permissions(
    conn: &mut PgConnection,
    role_id: DbId,
    permissions: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *conn)
        .await?;
    if permissions.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission)
         SELECT $1, UNNEST($2::TEXT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(role_id)
    .bind(permissions)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl RoleStore for RoleRepo {
    async fn list(&self, filter: &RoleFilter) -> StoreResult<Vec<Role>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM roles {where_clause}
             ORDER BY name, id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let roles = conditions
            .bind_all(sqlx::query_as::<_, Role>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn count(&self, filter: &RoleFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!("SELECT COUNT(*) FROM roles {}", conditions.where_clause());
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Role>> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_role(&mut conn, id).await?)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = ANY($1) ORDER BY name, id");
        let roles = sqlx::query_as::<_, Role>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn create(&self, input: &CreateRole) -> StoreResult<Role> {
        let mut tx = self.pool.begin().await?;
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO roles (name, description, color)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .fetch_one(&mut *tx)
        .await?;
        set_permissions(&mut tx, id, &input.permissions).await?;
        let role = fetch_role(&mut tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(role)
    }

    async fn update(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<Role>> {
        let mut tx = self.pool.begin().await?;
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE roles SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                color = COALESCE($5, color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.description.is_some())
        .bind(input.description.clone().flatten())
        .bind(&input.color)
        .fetch_optional(&mut *tx)
        .await?;
        if updated.is_none() {
            return Ok(None);
        }
        if let Some(permissions) = &input.permissions {
            set_permissions(&mut tx, id, permissions).await?;
        }
        let role = fetch_role(&mut tx, id).await?;
        tx.commit().await?;
        Ok(role)
    }

    async fn delete_unassigned(&self, id: DbId) -> StoreResult<RoleDeletion> {
        let mut tx = self.pool.begin().await?;

        // Locking the row blocks concurrent user_roles inserts (their FK
        // check takes a KEY SHARE lock) until this transaction ends.
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(RoleDeletion::NotFound);
        }

        let user_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if user_count > 0 {
            return Ok(RoleDeletion::InUse { user_count });
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(RoleDeletion::Deleted)
    }
}
