use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::schemas::auth::LoginInput;
use fieldhub_core::status::UserStatus;
use fieldhub_db::models::user::UserResponse;
use fieldhub_db::store::UserStore;
use fieldhub_db::Stores;

use super::user::normalize_email;
use crate::auth::password::verify_password;

/// Credential checks for the login endpoint.
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
        }
    }

    /// Check an email / password pair.
    ///
    /// Returns `Ok(None)` when the user does not exist, is not `ACTIVE`, or
    /// the password does not match; callers must not reveal which. On
    /// success `last_login_at` is stamped and the sanitized user returned.
    pub async fn authenticate(
        &self,
        credentials: &LoginInput,
    ) -> Result<Option<UserResponse>, CoreError> {
        let email = normalize_email(&credentials.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login rejected: unknown email");
            return Ok(None);
        };

        if user.status != UserStatus::Active {
            tracing::warn!(user_id = user.id, status = %user.status, "Login rejected: inactive account");
            return Ok(None);
        }

        match verify_password(&credentials.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(user_id = user.id, "Login rejected: wrong password");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                return Ok(None);
            }
        }

        let Some(user) = self.users.record_login(user.id).await? else {
            return Ok(None);
        };
        let roles = self
            .users
            .roles_for_users(&[user.id])
            .await?
            .into_iter()
            .map(|row| row.role)
            .collect();

        tracing::info!(user_id = user.id, "User logged in");
        Ok(Some(UserResponse::new(user, roles)))
    }
}
