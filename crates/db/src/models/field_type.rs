//! Field type entity model and DTOs.

use fieldhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `field_types` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FieldType {
    pub id: DbId,
    pub name: String,
    pub validation: Option<serde_json::Value>,
    pub is_system: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a field type.
#[derive(Debug, Clone)]
pub struct CreateFieldType {
    pub name: String,
    pub validation: Option<serde_json::Value>,
    pub is_system: bool,
}

/// List criteria for field types.
#[derive(Debug, Clone)]
pub struct FieldTypeFilter {
    /// Case-insensitive substring over the name.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
