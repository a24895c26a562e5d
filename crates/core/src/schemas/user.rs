//! User schemas.

use serde::Deserialize;
use validator::Validate;

use super::{trimmed, trimmed_option};
use crate::pagination::{default_limit, default_page, MAX_LIMIT, MAX_PAGE};
use crate::status::{RoleAction, UserStatus};
use crate::types::DbId;
use crate::validation::not_blank;

/// Minimum password length accepted on create, update and bootstrap.
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = 128))]
    pub password: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub role_ids: Vec<DbId>,
}

/// Body of `PUT /api/users/{id}`. Absent fields are left unchanged;
/// `role_ids`, when present, replaces the user's role set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = 128))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    pub status: Option<UserStatus>,
    pub role_ids: Option<Vec<DbId>>,
}

/// Query string of `GET /api/users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    #[serde(rename = "roleId", alias = "role_id")]
    pub role_id: Option<DbId>,
}

super::list_query!(UserListQuery);

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
            role_id: None,
        }
    }
}

/// Body of `POST /api/users/{id}/roles`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManageRolesInput {
    #[validate(length(max = 100))]
    pub role_ids: Vec<DbId>,
    pub action: RoleAction,
}
