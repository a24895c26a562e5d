//! Field entity model and DTOs.

use fieldhub_core::status::FieldStatus;
use fieldhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::field_rule::FieldRule;

/// A row from the `fields` table plus the number of rules referencing it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Field {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Name of the field type (`field_types.name`).
    #[serde(rename = "type")]
    pub type_name: String,
    pub parent_id: Option<DbId>,
    /// Ordered list of allowed values.
    pub values: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: FieldStatus,
    pub is_required: bool,
    /// Rules where this field is the condition or the target.
    pub rule_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A field with the rules that reference it.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDetail {
    #[serde(flatten)]
    pub field: Field,
    pub rules: Vec<FieldRule>,
}

/// DTO for creating a field.
#[derive(Debug, Clone)]
pub struct CreateField {
    pub name: String,
    pub description: Option<String>,
    pub type_name: String,
    pub parent_id: Option<DbId>,
    pub values: Vec<String>,
    pub status: FieldStatus,
    pub is_required: bool,
}

/// DTO for updating a field. `parent_id: Some(None)` clears the parent.
#[derive(Debug, Clone, Default)]
pub struct UpdateField {
    pub name: Option<String>,
    pub description: Option<String>,
    pub type_name: Option<String>,
    pub parent_id: Option<Option<DbId>>,
    pub values: Option<Vec<String>>,
    pub status: Option<FieldStatus>,
    pub is_required: Option<bool>,
}

/// List criteria for fields.
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub status: Option<FieldStatus>,
    pub type_name: Option<String>,
    /// `Some(true)`: only fields referenced by a rule; `Some(false)`: only unreferenced.
    pub has_rules: Option<bool>,
    /// `Some(true)`: only fields with at least one allowed value.
    pub has_values: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}
