use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::user::{
    CreateUserInput, ManageRolesInput, UpdateUserInput, UserListQuery,
};
use fieldhub_core::status::RoleAction;
use fieldhub_core::types::DbId;
use fieldhub_db::models::user::{
    CreateUser, RoleSummary, UpdateUser, User, UserFilter, UserResponse,
};
use fieldhub_db::store::{RoleStore, UserStore};
use fieldhub_db::Stores;

use super::dedup_ids;
use crate::auth::password::hash_password;

const EMAIL_TAKEN: &str = "A user with this email already exists";

/// Emails are stored and looked up lower-cased and trimmed.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User accounts and their role assignments.
pub struct UserService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
}

impl UserService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
            roles: stores.roles.clone(),
        }
    }

    pub async fn list(&self, query: &UserListQuery) -> Result<Page<UserResponse>, CoreError> {
        let request = query.page_request();
        let filter = UserFilter {
            search: query.search().map(str::to_string),
            status: query.status,
            role_id: query.role_id,
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.users.count(&filter).await?;
        let users = self.users.list(&filter).await?;
        let items = self.with_roles(users).await?;
        Ok(Page::new(items, request, total))
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<UserResponse, CoreError> {
        let user = self.find(id).await?;
        self.with_roles_one(user).await
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<UserResponse, CoreError> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
        }

        let role_ids = dedup_ids(input.role_ids);
        self.ensure_roles_exist(&role_ids).await?;

        let user = self
            .users
            .create(&CreateUser {
                email,
                password_hash: hash_password(&input.password)?,
                name: input.name.trim().to_string(),
                status: input.status,
                role_ids,
            })
            .await?;

        tracing::info!(user_id = user.id, email = %user.email, "User created");
        self.with_roles_one(user).await
    }

    /// Apply a partial update. `role_ids`, when present, replaces the role set.
    pub async fn update(&self, id: DbId, input: UpdateUserInput) -> Result<UserResponse, CoreError> {
        let existing = self.find(id).await?;

        let email = input.email.as_deref().map(normalize_email);
        if let Some(email) = email.as_deref().filter(|e| *e != existing.email) {
            if let Some(other) = self.users.find_by_email(email).await? {
                if other.id != id {
                    return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
                }
            }
        }

        let role_ids = input.role_ids.map(dedup_ids);
        if let Some(ids) = &role_ids {
            self.ensure_roles_exist(ids).await?;
        }

        let password_hash = input.password.as_deref().map(hash_password).transpose()?;

        let user = self
            .users
            .update(
                id,
                &UpdateUser {
                    email,
                    password_hash,
                    name: input.name.map(|n| n.trim().to_string()),
                    status: input.status,
                    role_ids,
                },
            )
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })?;

        tracing::info!(user_id = id, "User updated");
        self.with_roles_one(user).await
    }

    /// Delete a user. The acting user cannot delete their own account.
    pub async fn delete(&self, id: DbId, acting_user_id: DbId) -> Result<(), CoreError> {
        if id == acting_user_id {
            return Err(CoreError::Validation(
                "You cannot delete your own account".into(),
            ));
        }
        if !self.users.delete(id).await? {
            return Err(CoreError::NotFound { entity: "User", id });
        }
        tracing::info!(user_id = id, deleted_by = acting_user_id, "User deleted");
        Ok(())
    }

    /// The user's current roles, ordered by name.
    pub async fn roles(&self, user_id: DbId) -> Result<Vec<RoleSummary>, CoreError> {
        self.find(user_id).await?;
        self.role_summaries(user_id).await
    }

    /// Add, remove or replace the user's roles, returning the resulting set.
    pub async fn manage_roles(
        &self,
        user_id: DbId,
        input: ManageRolesInput,
    ) -> Result<Vec<RoleSummary>, CoreError> {
        self.find(user_id).await?;
        let role_ids = dedup_ids(input.role_ids);
        self.ensure_roles_exist(&role_ids).await?;

        match input.action {
            RoleAction::Add => self.users.add_roles(user_id, &role_ids).await?,
            RoleAction::Remove => self.users.remove_roles(user_id, &role_ids).await?,
            RoleAction::Replace => self.users.replace_roles(user_id, &role_ids).await?,
        }

        tracing::info!(user_id, action = %input.action, role_ids = ?role_ids, "User roles changed");
        self.role_summaries(user_id).await
    }

    async fn find(&self, id: DbId) -> Result<User, CoreError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })
    }

    async fn role_summaries(&self, user_id: DbId) -> Result<Vec<RoleSummary>, CoreError> {
        let rows = self.users.roles_for_users(&[user_id]).await?;
        Ok(rows.into_iter().map(|row| row.role).collect())
    }

    async fn with_roles_one(&self, user: User) -> Result<UserResponse, CoreError> {
        let roles = self.role_summaries(user.id).await?;
        Ok(UserResponse::new(user, roles))
    }

    /// Attach role summaries to a whole page with one store round trip.
    async fn with_roles(&self, users: Vec<User>) -> Result<Vec<UserResponse>, CoreError> {
        let ids: Vec<DbId> = users.iter().map(|u| u.id).collect();
        let mut by_user: HashMap<DbId, Vec<RoleSummary>> = HashMap::new();
        for row in self.users.roles_for_users(&ids).await? {
            by_user.entry(row.user_id).or_default().push(row.role);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let roles = by_user.remove(&user.id).unwrap_or_default();
                UserResponse::new(user, roles)
            })
            .collect())
    }

    /// `NotFound` for the first id with no role behind it.
    async fn ensure_roles_exist(&self, role_ids: &[DbId]) -> Result<(), CoreError> {
        if role_ids.is_empty() {
            return Ok(());
        }
        let found: HashSet<DbId> = self
            .roles
            .find_many(role_ids)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        match role_ids.iter().find(|id| !found.contains(id)) {
            Some(&id) => Err(CoreError::NotFound { entity: "Role", id }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
