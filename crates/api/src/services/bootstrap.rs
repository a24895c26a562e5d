//! First-start administrator provisioning.

use fieldhub_core::error::CoreError;
use fieldhub_core::schemas::user::CreateUserInput;
use fieldhub_core::status::UserStatus;
use fieldhub_core::validation::validate_input;
use fieldhub_db::models::user::{UserFilter, UserResponse};
use fieldhub_db::seed::ADMIN_ROLE;
use fieldhub_db::Stores;

use super::UserService;
use crate::config::BootstrapAdmin;

/// Create the configured administrator when no user exists yet.
///
/// Returns the created user, or `None` when the store already holds users.
/// The account is `ACTIVE` and holds the seeded admin role when present.
pub async fn ensure_admin(
    stores: &Stores,
    admin: &BootstrapAdmin,
) -> Result<Option<UserResponse>, CoreError> {
    let everyone = UserFilter {
        search: None,
        status: None,
        role_id: None,
        limit: 1,
        offset: 0,
    };
    let existing = stores.users.count(&everyone).await?;
    if existing > 0 {
        tracing::debug!(existing, "Users present, skipping admin bootstrap");
        return Ok(None);
    }

    let role_ids = match stores.roles.find_by_name(ADMIN_ROLE).await? {
        Some(role) => vec![role.id],
        None => {
            tracing::warn!(role = ADMIN_ROLE, "Admin role missing, bootstrap user gets no roles");
            Vec::new()
        }
    };

    let input = CreateUserInput {
        email: admin.email.clone(),
        password: admin.password.clone(),
        name: admin.name.clone(),
        status: UserStatus::Active,
        role_ids,
    };
    validate_input(&input)?;

    let user = UserService::new(stores).create(input).await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");
    Ok(Some(user))
}
