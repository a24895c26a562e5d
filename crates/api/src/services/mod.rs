//! Entity services: the business rules between HTTP handlers and stores.
//!
//! Each service holds the `Arc<dyn ...Store>` handles it needs, taken from
//! [`Stores`](fieldhub_db::Stores), and returns `Result<_, CoreError>`.
//! Services are cheap to build, so handlers construct one per request.

pub mod auth;
pub mod bootstrap;
pub mod field;
pub mod field_rule;
pub mod field_type;
pub mod project;
pub mod role;
pub mod user;

pub use auth::AuthService;
pub use field::FieldService;
pub use field_rule::FieldRuleService;
pub use field_type::FieldTypeService;
pub use project::ProjectService;
pub use role::RoleService;
pub use user::UserService;

use std::collections::HashSet;

use fieldhub_core::types::DbId;
use validator::ValidationError;

/// Remove repeated ids, keeping the first occurrence of each.
pub(crate) fn dedup_ids(ids: Vec<DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// The message carried by a hand-built validator error.
pub(crate) fn validation_message(error: ValidationError) -> String {
    error
        .message
        .map(|m| m.into_owned())
        .unwrap_or_else(|| error.code.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_ids_keeps_order() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn validation_message_prefers_message() {
        let mut err = ValidationError::new("code_only");
        assert_eq!(validation_message(err.clone()), "code_only");
        err.message = Some("readable".into());
        assert_eq!(validation_message(err), "readable");
    }
}
