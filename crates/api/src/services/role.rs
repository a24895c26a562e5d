use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::role::{CreateRoleInput, RoleListQuery, UpdateRoleInput};
use fieldhub_core::types::DbId;
use fieldhub_db::models::role::{CreateRole, Role, RoleDeletion, RoleFilter, UpdateRole};
use fieldhub_db::store::RoleStore;
use fieldhub_db::Stores;

const NAME_TAKEN: &str = "A role with this name already exists";

/// Roles and their permission sets.
pub struct RoleService {
    roles: Arc<dyn RoleStore>,
}

impl RoleService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            roles: stores.roles.clone(),
        }
    }

    pub async fn list(&self, query: &RoleListQuery) -> Result<Page<Role>, CoreError> {
        let request = query.page_request();
        let filter = RoleFilter {
            search: query.search().map(str::to_string),
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.roles.count(&filter).await?;
        let items = self.roles.list(&filter).await?;
        Ok(Page::new(items, request, total))
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Role, CoreError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Role", id })
    }

    pub async fn create(&self, input: CreateRoleInput) -> Result<Role, CoreError> {
        let name = input.name.trim().to_string();
        if self.roles.find_by_name(&name).await?.is_some() {
            return Err(CoreError::Conflict(NAME_TAKEN.into()));
        }

        let role = self
            .roles
            .create(&CreateRole {
                name,
                description: input.description,
                color: input.color,
                permissions: input.permissions,
            })
            .await?;

        tracing::info!(role_id = role.id, name = %role.name, "Role created");
        Ok(role)
    }

    pub async fn update(&self, id: DbId, input: UpdateRoleInput) -> Result<Role, CoreError> {
        let existing = self.get_by_id(id).await?;

        let name = input.name.map(|n| n.trim().to_string());
        if let Some(name) = name.as_deref().filter(|n| *n != existing.name) {
            if let Some(other) = self.roles.find_by_name(name).await? {
                if other.id != id {
                    return Err(CoreError::Conflict(NAME_TAKEN.into()));
                }
            }
        }

        let role = self
            .roles
            .update(
                id,
                &UpdateRole {
                    name,
                    description: input.description,
                    color: input.color,
                    permissions: input.permissions,
                },
            )
            .await?
            .ok_or(CoreError::NotFound { entity: "Role", id })?;

        tracing::info!(role_id = id, "Role updated");
        Ok(role)
    }

    /// Delete a role nobody holds. The in-use check and the deletion run in
    /// one store transaction.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        match self.roles.delete_unassigned(id).await? {
            RoleDeletion::Deleted => {
                tracing::info!(role_id = id, "Role deleted");
                Ok(())
            }
            RoleDeletion::NotFound => Err(CoreError::NotFound { entity: "Role", id }),
            RoleDeletion::InUse { user_count } => Err(CoreError::Conflict(format!(
                "Role is assigned to {user_count} user(s) and cannot be deleted"
            ))),
        }
    }
}
