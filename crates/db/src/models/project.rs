//! Project and project-field models and DTOs.

use fieldhub_core::status::ProjectStatus;
use fieldhub_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::field_rule::FieldRule;

/// A row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Creating user; `None` once that user has been deleted.
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project with its field bindings and project-scoped rules.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub fields: Vec<ProjectField>,
    pub rules: Vec<FieldRule>,
}

/// A row from the `project_fields` table binding a field (by name) to a project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProjectField {
    pub id: DbId,
    pub project_id: DbId,
    pub field_name: String,
    pub value: Option<String>,
    pub is_visible: bool,
    pub is_required: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub owner_id: Option<DbId>,
}

/// DTO for updating a project. Description and dates use `Some(None)` to
/// clear.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Option<Date>>,
    pub end_date: Option<Option<Date>>,
}

/// DTO for one project field binding.
#[derive(Debug, Clone)]
pub struct CreateProjectField {
    pub field_name: String,
    pub value: Option<String>,
    pub is_visible: bool,
    pub is_required: bool,
    pub display_order: i32,
}

/// List criteria for projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub limit: i64,
    pub offset: i64,
}
