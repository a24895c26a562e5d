//! User entity model and DTOs.

use fieldhub_core::status::UserStatus;
use fieldhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The part of a role embedded in user responses and session tokens.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// A `user_roles` row joined with its role.
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleRow {
    pub user_id: DbId,
    #[sqlx(flatten)]
    pub role: RoleSummary,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub status: UserStatus,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub roles: Vec<RoleSummary>,
}

impl UserResponse {
    pub fn new(user: User, roles: Vec<RoleSummary>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
            roles,
        }
    }
}

/// DTO for creating a new user together with its initial roles.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub status: UserStatus,
    pub role_ids: Vec<DbId>,
}

/// DTO for updating an existing user. All fields are optional;
/// `role_ids` replaces the role set when present.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub status: Option<UserStatus>,
    pub role_ids: Option<Vec<DbId>>,
}

/// List criteria for users.
#[derive(Debug, Clone)]
pub struct UserFilter {
    /// Case-insensitive substring over name and email.
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    /// Only users holding this role.
    pub role_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
