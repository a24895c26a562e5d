//! Role entity model and DTOs.

use fieldhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::user::RoleSummary;

/// A role row from the `roles` table with its permissions and usage count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    /// Sorted permission names from `role_permissions`.
    pub permissions: Vec<String>,
    /// Number of users currently holding the role.
    pub user_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Role {
    pub fn summary(&self) -> RoleSummary {
        RoleSummary {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// DTO for creating a role.
#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub permissions: Vec<String>,
}

/// DTO for updating a role. `permissions` replaces the set when present;
/// `description` uses `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// List criteria for roles.
#[derive(Debug, Clone)]
pub struct RoleFilter {
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Outcome of a guarded role deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDeletion {
    Deleted,
    NotFound,
    /// Left untouched because users still hold the role.
    InUse { user_count: i64 },
}
