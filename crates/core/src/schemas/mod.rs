//! Validated input schemas, one per entity and operation.
//!
//! Every struct here derives `Deserialize` (with defaults for absent
//! fields) and `validator::Validate`. HTTP extractors run both steps before
//! a handler sees the value; services accept the typed result.

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in update bodies. Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Strip surrounding whitespace before length checks run.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// [`trimmed`] for optional fields. Use together with `#[serde(default)]`.
pub(crate) fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| s.trim().to_string()))
}

/// Trimmed search term, `None` when absent or blank.
pub(crate) fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Implements `page_request()` and `search()` for a list-query schema with
/// `page`, `limit` and `search` fields.
macro_rules! list_query {
    ($name:ident) => {
        impl $name {
            pub fn page_request(&self) -> $crate::pagination::PageRequest {
                $crate::pagination::PageRequest::new(self.page, self.limit)
            }

            pub fn search(&self) -> Option<&str> {
                $crate::schemas::search_term(&self.search)
            }
        }
    };
}

pub(crate) use list_query;

pub mod auth;
pub mod field;
pub mod field_rule;
pub mod field_type;
pub mod project;
pub mod role;
pub mod user;
