//! Store traits: the persistence seam services depend on.
//!
//! Services hold `Arc<dyn ...Store>` handles so the same business logic runs
//! against PostgreSQL ([`Stores::postgres`]) or the in-memory substitute
//! ([`Stores::in_memory`]).

use std::sync::Arc;

use async_trait::async_trait;
use fieldhub_core::types::DbId;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::models::field::{CreateField, Field, FieldFilter, UpdateField};
use crate::models::field_rule::{FieldRule, FieldRuleData, FieldRuleFilter};
use crate::models::field_type::{CreateFieldType, FieldType, FieldTypeFilter};
use crate::models::project::{
    CreateProject, CreateProjectField, Project, ProjectField, ProjectFilter, UpdateProject,
};
use crate::models::role::{CreateRole, Role, RoleDeletion, RoleFilter, UpdateRole};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter, UserRoleRow};
use crate::repositories::{
    FieldRepo, FieldRuleRepo, FieldTypeRepo, PgHealthCheck, ProjectRepo, RoleRepo, UserRepo,
};
use crate::DbPool;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// One page of users matching `filter`, ordered by name then id.
    async fn list(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;

    /// Number of users matching `filter` (ignores limit / offset).
    async fn count(&self, filter: &UserFilter) -> StoreResult<i64>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>>;

    /// Exact match on the stored (lower-cased) email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert the user and its role assignments atomically.
    async fn create(&self, input: &CreateUser) -> StoreResult<User>;

    /// Apply a partial update. Returns `None` if no row has `id`.
    async fn update(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Stamp `last_login_at = now`, returning the refreshed row.
    async fn record_login(&self, id: DbId) -> StoreResult<Option<User>>;

    /// Role summaries for every given user, ordered by role name.
    async fn roles_for_users(&self, user_ids: &[DbId]) -> StoreResult<Vec<UserRoleRow>>;

    /// Set union: assign roles the user does not hold yet.
    async fn add_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()>;

    /// Set difference: unassign roles; absent ones are ignored.
    async fn remove_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()>;

    /// Delete every assignment then insert `role_ids`, in one transaction.
    async fn replace_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list(&self, filter: &RoleFilter) -> StoreResult<Vec<Role>>;
    async fn count(&self, filter: &RoleFilter) -> StoreResult<i64>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Role>>;

    /// Exact name lookup.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    /// All roles whose id is in `ids` (missing ids are simply absent).
    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Role>>;

    async fn create(&self, input: &CreateRole) -> StoreResult<Role>;
    async fn update(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<Role>>;

    /// In one transaction: refuse if any user holds the role, otherwise
    /// remove its permission rows, user-role rows and the role itself.
    async fn delete_unassigned(&self, id: DbId) -> StoreResult<RoleDeletion>;
}

#[async_trait]
pub trait FieldTypeStore: Send + Sync {
    async fn list(&self, filter: &FieldTypeFilter) -> StoreResult<Vec<FieldType>>;
    async fn count(&self, filter: &FieldTypeFilter) -> StoreResult<i64>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldType>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<FieldType>>;

    async fn create(&self, input: &CreateFieldType) -> StoreResult<FieldType>;
}

#[async_trait]
pub trait FieldStore: Send + Sync {
    async fn list(&self, filter: &FieldFilter) -> StoreResult<Vec<Field>>;
    async fn count(&self, filter: &FieldFilter) -> StoreResult<i64>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Field>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Field>>;

    /// Fields whose names are in `names`.
    async fn find_by_names(&self, names: &[String]) -> StoreResult<Vec<Field>>;

    async fn create(&self, input: &CreateField) -> StoreResult<Field>;
    async fn update(&self, id: DbId, input: &UpdateField) -> StoreResult<Option<Field>>;

    /// Remove the field. Children lose their parent; rules and project
    /// bindings referencing the field are removed with it.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait FieldRuleStore: Send + Sync {
    /// Ordered by id.
    async fn list(&self, filter: &FieldRuleFilter) -> StoreResult<Vec<FieldRule>>;
    async fn count(&self, filter: &FieldRuleFilter) -> StoreResult<i64>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldRule>>;

    /// Every rule where `field_id` is the condition or the target.
    async fn list_for_field(&self, field_id: DbId) -> StoreResult<Vec<FieldRule>>;

    /// Every rule scoped to `project_id`.
    async fn list_for_project(&self, project_id: DbId) -> StoreResult<Vec<FieldRule>>;

    async fn create(&self, input: &FieldRuleData) -> StoreResult<FieldRule>;

    /// Overwrite every writable column. Returns `None` if no row has `id`.
    async fn replace(&self, id: DbId, input: &FieldRuleData) -> StoreResult<Option<FieldRule>>;

    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>>;
    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>>;
    async fn create(&self, input: &CreateProject) -> StoreResult<Project>;
    async fn update(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>>;

    /// Remove the project with its field bindings and scoped rules.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Field bindings ordered by `display_order`, then id.
    async fn fields(&self, project_id: DbId) -> StoreResult<Vec<ProjectField>>;

    /// Replace every binding of the project in one transaction.
    async fn replace_fields(
        &self,
        project_id: DbId,
        fields: &[CreateProjectField],
    ) -> StoreResult<Vec<ProjectField>>;
}

/// Reachability probe for the underlying store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// Every store handle a service may need, cheaply cloneable.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub field_types: Arc<dyn FieldTypeStore>,
    pub fields: Arc<dyn FieldStore>,
    pub field_rules: Arc<dyn FieldRuleStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub health: Arc<dyn HealthCheck>,
}

impl Stores {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(UserRepo::new(pool.clone())),
            roles: Arc::new(RoleRepo::new(pool.clone())),
            field_types: Arc::new(FieldTypeRepo::new(pool.clone())),
            fields: Arc::new(FieldRepo::new(pool.clone())),
            field_rules: Arc::new(FieldRuleRepo::new(pool.clone())),
            projects: Arc::new(ProjectRepo::new(pool.clone())),
            health: Arc::new(PgHealthCheck::new(pool.clone())),
        }
    }

    /// A fresh in-memory store holding the same seed rows as a migrated
    /// database.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::seeded()))
    }

    /// Share an existing in-memory store (lets tests seed it directly).
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            roles: store.clone(),
            field_types: store.clone(),
            fields: store.clone(),
            field_rules: store.clone(),
            projects: store.clone(),
            health: store,
        }
    }
}
