//! Repository for the `users` and `user_roles` tables.

use async_trait::async_trait;
use fieldhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::{BindValue, Conditions};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter, UserRoleRow};
use crate::store::{StoreResult, UserStore};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, name, status, last_login_at, created_at, updated_at";

/// PostgreSQL-backed [`UserStore`].
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conditions(filter: &UserFilter) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.search(filter.search.as_deref(), &["name", "email"]);
        if let Some(status) = filter.status {
            conditions.bind("status = {}", BindValue::Text(status.as_str().to_string()));
        }
        if let Some(role_id) = filter.role_id {
            conditions.bind(
                "EXISTS (SELECT 1 FROM user_roles ur WHERE ur.user_id = users.id AND ur.role_id = {})",
                BindValue::BigInt(role_id),
            );
        }
        conditions
    }
}

/// Assign `role_ids` to the user, skipping roles it already holds.
async fn insert_roles(
    conn: &mut PgConnection,
    user_id: DbId,
    role_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if role_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role_ids)
    .execute(conn)
    .await?;
    Ok(())
}

async fn clear_roles(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl UserStore for UserRepo {
    async fn list(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let conditions = Self::conditions(filter);
        let idx = conditions.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM users {where_clause}
             ORDER BY name, id
             LIMIT ${idx} OFFSET ${next}",
            where_clause = conditions.where_clause(),
            next = idx + 1,
        );
        let users = conditions
            .bind_all(sqlx::query_as::<_, User>(&query))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn count(&self, filter: &UserFilter) -> StoreResult<i64> {
        let conditions = Self::conditions(filter);
        let query = format!(
            "SELECT COUNT(*) FROM users {}",
            conditions.where_clause()
        );
        let total = conditions
            .bind_all_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "INSERT INTO users (email, password_hash, name, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(input.status.as_str())
            .fetch_one(&mut *tx)
            .await?;
        insert_roles(&mut tx, user.id, &input.role_ids).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                name = COALESCE($4, name),
                status = COALESCE($5, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&mut *tx)
            .await?;
        let Some(user) = user else {
            return Ok(None);
        };
        if let Some(role_ids) = &input.role_ids {
            clear_roles(&mut tx, id).await?;
            insert_roles(&mut tx, id, role_ids).await?;
        }
        tx.commit().await?;
        Ok(Some(user))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_login(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!(
            "UPDATE users SET last_login_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn roles_for_users(&self, user_ids: &[DbId]) -> StoreResult<Vec<UserRoleRow>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, UserRoleRow>(
            "SELECT ur.user_id, r.id, r.name, r.color
             FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = ANY($1)
             ORDER BY r.name, r.id",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_roles(&mut conn, user_id, role_ids).await?;
        Ok(())
    }

    async fn remove_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = ANY($2)")
            .bind(user_id)
            .bind(role_ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        clear_roles(&mut tx, user_id).await?;
        insert_roles(&mut tx, user_id, role_ids).await?;
        tx.commit().await?;
        Ok(())
    }
}
