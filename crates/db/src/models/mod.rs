//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts and an update DTO (all `Option` fields) for patches
//! - A filter struct carrying list criteria plus `limit` / `offset`

pub mod field;
pub mod field_rule;
pub mod field_type;
pub mod project;
pub mod role;
pub mod user;
