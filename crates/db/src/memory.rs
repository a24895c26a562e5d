//! In-memory implementation of every store trait.
//!
//! Used by tests that exercise services and routes without a database. It
//! reports the same constraint names as the migrations, cascades deletes the
//! same way, and orders lists the same way as the PostgreSQL repositories.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use fieldhub_core::types::DbId;

use crate::error::StoreError;
use crate::models::field::{CreateField, Field, FieldFilter, UpdateField};
use crate::models::field_rule::{FieldRule, FieldRuleData, FieldRuleFilter};
use crate::models::field_type::{CreateFieldType, FieldType, FieldTypeFilter};
use crate::models::project::{
    CreateProject, CreateProjectField, Project, ProjectField, ProjectFilter, UpdateProject,
};
use crate::models::role::{CreateRole, Role, RoleDeletion, RoleFilter, UpdateRole};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter, UserRoleRow};
use crate::seed::{SEED_ROLES, SYSTEM_FIELD_TYPES};
use crate::store::{
    FieldRuleStore, FieldStore, FieldTypeStore, HealthCheck, ProjectStore, RoleStore,
    StoreResult, UserStore,
};

#[derive(Default)]
struct Tables {
    sequences: BTreeMap<&'static str, DbId>,
    users: BTreeMap<DbId, User>,
    /// `(user_id, role_id)` pairs.
    user_roles: BTreeSet<(DbId, DbId)>,
    roles: BTreeMap<DbId, Role>,
    field_types: BTreeMap<DbId, FieldType>,
    fields: BTreeMap<DbId, Field>,
    field_rules: BTreeMap<DbId, FieldRule>,
    projects: BTreeMap<DbId, Project>,
    project_fields: BTreeMap<DbId, ProjectField>,
}

/// Mutex-guarded tables standing in for the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// An empty store with no seed rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the seed roles and system field types.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut t = store.lock();
            let now = Utc::now();
            for seed in SEED_ROLES {
                let id = t.next_id("roles");
                let mut permissions: Vec<String> =
                    seed.permissions.iter().map(|p| p.to_string()).collect();
                permissions.sort();
                t.roles.insert(
                    id,
                    Role {
                        id,
                        name: seed.name.to_string(),
                        description: Some(seed.description.to_string()),
                        color: seed.color.to_string(),
                        permissions,
                        user_count: 0,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
            for name in SYSTEM_FIELD_TYPES {
                let id = t.next_id("field_types");
                t.field_types.insert(
                    id,
                    FieldType {
                        id,
                        name: name.to_string(),
                        validation: None,
                        is_system: true,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation(constraint.to_string())
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation(constraint.to_string())
}

/// Case-insensitive substring match, the semantics of `ILIKE '%term%'`.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_search(search: Option<&str>, columns: &[Option<&str>]) -> bool {
    match search {
        None => true,
        Some(term) => columns
            .iter()
            .flatten()
            .any(|column| contains_ci(column, term)),
    }
}

fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(0))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

fn count_of<T>(items: &[T]) -> i64 {
    i64::try_from(items.len()).unwrap_or(i64::MAX)
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> DbId {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    // -- users ---------------------------------------------------------------

    fn filtered_users(&self, filter: &UserFilter) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .values()
            .filter(|u| {
                matches_search(
                    filter.search.as_deref(),
                    &[Some(u.name.as_str()), Some(u.email.as_str())],
                ) && filter.status.is_none_or(|status| u.status == status)
                    && filter
                        .role_id
                        .is_none_or(|role_id| self.user_roles.contains(&(u.id, role_id)))
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        users
    }

    fn check_roles_exist(&self, role_ids: &[DbId]) -> StoreResult<()> {
        if role_ids.iter().any(|id| !self.roles.contains_key(id)) {
            return Err(foreign_key("fk_user_roles_role"));
        }
        Ok(())
    }

    fn set_user_roles(&mut self, user_id: DbId, role_ids: &[DbId]) {
        self.user_roles.retain(|(uid, _)| *uid != user_id);
        for role_id in role_ids {
            self.user_roles.insert((user_id, *role_id));
        }
    }

    // -- roles ---------------------------------------------------------------

    fn role_with_count(&self, role: &Role) -> Role {
        let mut role = role.clone();
        role.user_count = count_of(
            &self
                .user_roles
                .iter()
                .filter(|(_, role_id)| *role_id == role.id)
                .collect::<Vec<_>>(),
        );
        role
    }

    fn filtered_roles(&self, filter: &RoleFilter) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .roles
            .values()
            .filter(|r| {
                matches_search(
                    filter.search.as_deref(),
                    &[Some(r.name.as_str()), r.description.as_deref()],
                )
            })
            .map(|r| self.role_with_count(r))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        roles
    }

    // -- fields --------------------------------------------------------------

    fn field_with_count(&self, field: &Field) -> Field {
        let mut field = field.clone();
        field.rule_count = count_of(
            &self
                .field_rules
                .values()
                .filter(|r| r.condition_field_id == field.id || r.target_field_id == field.id)
                .collect::<Vec<_>>(),
        );
        field
    }

    fn filtered_fields(&self, filter: &FieldFilter) -> Vec<Field> {
        let mut fields: Vec<Field> = self
            .fields
            .values()
            .map(|f| self.field_with_count(f))
            .filter(|f| {
                matches_search(
                    filter.search.as_deref(),
                    &[Some(f.name.as_str()), f.description.as_deref()],
                ) && filter.status.is_none_or(|status| f.status == status)
                    && filter
                        .type_name
                        .as_deref()
                        .is_none_or(|type_name| f.type_name == type_name)
                    && filter
                        .has_rules
                        .is_none_or(|has_rules| (f.rule_count > 0) == has_rules)
                    && filter
                        .has_values
                        .is_none_or(|has_values| !f.values.is_empty() == has_values)
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        fields
    }

    fn check_field_refs(&self, type_name: &str, parent_id: Option<DbId>) -> StoreResult<()> {
        if !self.field_types.values().any(|t| t.name == type_name) {
            return Err(foreign_key("fk_fields_type"));
        }
        if let Some(parent_id) = parent_id {
            if !self.fields.contains_key(&parent_id) {
                return Err(foreign_key("fk_fields_parent"));
            }
        }
        Ok(())
    }

    // -- field rules ---------------------------------------------------------

    fn check_rule_refs(&self, input: &FieldRuleData) -> StoreResult<()> {
        if !self.fields.contains_key(&input.condition_field_id) {
            return Err(foreign_key("fk_field_rules_condition_field"));
        }
        if !self.fields.contains_key(&input.target_field_id) {
            return Err(foreign_key("fk_field_rules_target_field"));
        }
        if let Some(project_id) = input.project_id {
            if !self.projects.contains_key(&project_id) {
                return Err(foreign_key("fk_field_rules_project"));
            }
        }
        Ok(())
    }

    fn rules_where(&self, predicate: impl Fn(&FieldRule) -> bool) -> Vec<FieldRule> {
        // BTreeMap iteration is already ordered by id.
        self.field_rules
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    // -- projects ------------------------------------------------------------

    fn filtered_projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .values()
            .filter(|p| {
                matches_search(
                    filter.search.as_deref(),
                    &[Some(p.name.as_str()), p.description.as_deref()],
                ) && filter.status.is_none_or(|status| p.status == status)
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        projects
    }

    fn project_fields_of(&self, project_id: DbId) -> Vec<ProjectField> {
        let mut bindings: Vec<ProjectField> = self
            .project_fields
            .values()
            .filter(|pf| pf.project_id == project_id)
            .cloned()
            .collect();
        bindings.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(a.id.cmp(&b.id))
        });
        bindings
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let t = self.lock();
        Ok(paginate(t.filtered_users(filter), filter.limit, filter.offset))
    }

    async fn count(&self, filter: &UserFilter) -> StoreResult<i64> {
        Ok(count_of(&self.lock().filtered_users(filter)))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.lock();
        if t.users.values().any(|u| u.email == input.email) {
            return Err(unique("uq_users_email"));
        }
        t.check_roles_exist(&input.role_ids)?;

        let id = t.next_id("users");
        let now = Utc::now();
        let user = User {
            id,
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            name: input.name.clone(),
            status: input.status,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(id, user.clone());
        t.set_user_roles(id, &input.role_ids);
        Ok(user)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        let mut t = self.lock();
        if !t.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &input.email {
            if t.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(unique("uq_users_email"));
            }
        }
        if let Some(role_ids) = &input.role_ids {
            t.check_roles_exist(role_ids)?;
            t.set_user_roles(id, role_ids);
        }

        let Some(user) = t.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = &input.email {
            user.email = email.clone();
        }
        if let Some(password_hash) = &input.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(name) = &input.name {
            user.name = name.clone();
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        t.user_roles.retain(|(user_id, _)| *user_id != id);
        for project in t.projects.values_mut() {
            if project.owner_id == Some(id) {
                project.owner_id = None;
            }
        }
        Ok(true)
    }

    async fn record_login(&self, id: DbId) -> StoreResult<Option<User>> {
        let mut t = self.lock();
        Ok(t.users.get_mut(&id).map(|user| {
            user.last_login_at = Some(Utc::now());
            user.clone()
        }))
    }

    async fn roles_for_users(&self, user_ids: &[DbId]) -> StoreResult<Vec<UserRoleRow>> {
        let t = self.lock();
        let mut rows: Vec<UserRoleRow> = t
            .user_roles
            .iter()
            .filter(|(user_id, _)| user_ids.contains(user_id))
            .filter_map(|(user_id, role_id)| {
                t.roles.get(role_id).map(|role| UserRoleRow {
                    user_id: *user_id,
                    role: role.summary(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.role
                .name
                .cmp(&b.role.name)
                .then(a.role.id.cmp(&b.role.id))
        });
        Ok(rows)
    }

    async fn add_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        let mut t = self.lock();
        if !t.users.contains_key(&user_id) {
            return Err(foreign_key("fk_user_roles_user"));
        }
        t.check_roles_exist(role_ids)?;
        for role_id in role_ids {
            t.user_roles.insert((user_id, *role_id));
        }
        Ok(())
    }

    async fn remove_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        self.lock()
            .user_roles
            .retain(|(uid, rid)| *uid != user_id || !role_ids.contains(rid));
        Ok(())
    }

    async fn replace_roles(&self, user_id: DbId, role_ids: &[DbId]) -> StoreResult<()> {
        let mut t = self.lock();
        if !t.users.contains_key(&user_id) {
            return Err(foreign_key("fk_user_roles_user"));
        }
        t.check_roles_exist(role_ids)?;
        t.set_user_roles(user_id, role_ids);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list(&self, filter: &RoleFilter) -> StoreResult<Vec<Role>> {
        let t = self.lock();
        Ok(paginate(t.filtered_roles(filter), filter.limit, filter.offset))
    }

    async fn count(&self, filter: &RoleFilter) -> StoreResult<i64> {
        Ok(count_of(&self.lock().filtered_roles(filter)))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Role>> {
        let t = self.lock();
        Ok(t.roles.get(&id).map(|r| t.role_with_count(r)))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let t = self.lock();
        Ok(t
            .roles
            .values()
            .find(|r| r.name == name)
            .map(|r| t.role_with_count(r)))
    }

    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Role>> {
        let t = self.lock();
        let mut roles: Vec<Role> = ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| t.roles.get(id))
            .map(|r| t.role_with_count(r))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(roles)
    }

    async fn create(&self, input: &CreateRole) -> StoreResult<Role> {
        let mut t = self.lock();
        if t.roles.values().any(|r| r.name == input.name) {
            return Err(unique("uq_roles_name"));
        }
        let id = t.next_id("roles");
        let now = Utc::now();
        let permissions: BTreeSet<String> = input.permissions.iter().cloned().collect();
        let role = Role {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            color: input.color.clone(),
            permissions: permissions.into_iter().collect(),
            user_count: 0,
            created_at: now,
            updated_at: now,
        };
        t.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn update(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<Role>> {
        let mut t = self.lock();
        if let Some(name) = &input.name {
            if t.roles.values().any(|r| r.id != id && &r.name == name) {
                return Err(unique("uq_roles_name"));
            }
        }
        let Some(role) = t.roles.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            role.name = name.clone();
        }
        if let Some(description) = &input.description {
            role.description = description.clone();
        }
        if let Some(color) = &input.color {
            role.color = color.clone();
        }
        if let Some(permissions) = &input.permissions {
            let permissions: BTreeSet<String> = permissions.iter().cloned().collect();
            role.permissions = permissions.into_iter().collect();
        }
        role.updated_at = Utc::now();
        let role = role.clone();
        Ok(Some(t.role_with_count(&role)))
    }

    async fn delete_unassigned(&self, id: DbId) -> StoreResult<RoleDeletion> {
        let mut t = self.lock();
        let Some(role) = t.roles.get(&id) else {
            return Ok(RoleDeletion::NotFound);
        };
        let user_count = t.role_with_count(role).user_count;
        if user_count > 0 {
            return Ok(RoleDeletion::InUse { user_count });
        }
        t.user_roles.retain(|(_, role_id)| *role_id != id);
        t.roles.remove(&id);
        Ok(RoleDeletion::Deleted)
    }
}

#[async_trait]
impl FieldTypeStore for MemoryStore {
    async fn list(&self, filter: &FieldTypeFilter) -> StoreResult<Vec<FieldType>> {
        let t = self.lock();
        let mut types: Vec<FieldType> = t
            .field_types
            .values()
            .filter(|ft| matches_search(filter.search.as_deref(), &[Some(ft.name.as_str())]))
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(types, filter.limit, filter.offset))
    }

    async fn count(&self, filter: &FieldTypeFilter) -> StoreResult<i64> {
        let t = self.lock();
        let matching: Vec<&FieldType> = t
            .field_types
            .values()
            .filter(|ft| matches_search(filter.search.as_deref(), &[Some(ft.name.as_str())]))
            .collect();
        Ok(count_of(&matching))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldType>> {
        Ok(self.lock().field_types.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<FieldType>> {
        Ok(self
            .lock()
            .field_types
            .values()
            .find(|ft| ft.name == name)
            .cloned())
    }

    async fn create(&self, input: &CreateFieldType) -> StoreResult<FieldType> {
        let mut t = self.lock();
        if t.field_types.values().any(|ft| ft.name == input.name) {
            return Err(unique("uq_field_types_name"));
        }
        let id = t.next_id("field_types");
        let now = Utc::now();
        let field_type = FieldType {
            id,
            name: input.name.clone(),
            validation: input.validation.clone(),
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        };
        t.field_types.insert(id, field_type.clone());
        Ok(field_type)
    }
}

#[async_trait]
impl FieldStore for MemoryStore {
    async fn list(&self, filter: &FieldFilter) -> StoreResult<Vec<Field>> {
        let t = self.lock();
        Ok(paginate(t.filtered_fields(filter), filter.limit, filter.offset))
    }

    async fn count(&self, filter: &FieldFilter) -> StoreResult<i64> {
        Ok(count_of(&self.lock().filtered_fields(filter)))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Field>> {
        let t = self.lock();
        Ok(t.fields.get(&id).map(|f| t.field_with_count(f)))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Field>> {
        let t = self.lock();
        Ok(t
            .fields
            .values()
            .find(|f| f.name == name)
            .map(|f| t.field_with_count(f)))
    }

    async fn find_by_names(&self, names: &[String]) -> StoreResult<Vec<Field>> {
        let t = self.lock();
        let mut fields: Vec<Field> = t
            .fields
            .values()
            .filter(|f| names.contains(&f.name))
            .map(|f| t.field_with_count(f))
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(fields)
    }

    async fn create(&self, input: &CreateField) -> StoreResult<Field> {
        let mut t = self.lock();
        if t.fields.values().any(|f| f.name == input.name) {
            return Err(unique("uq_fields_name"));
        }
        t.check_field_refs(&input.type_name, input.parent_id)?;

        let id = t.next_id("fields");
        let now = Utc::now();
        let field = Field {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            type_name: input.type_name.clone(),
            parent_id: input.parent_id,
            values: input.values.clone(),
            status: input.status,
            is_required: input.is_required,
            rule_count: 0,
            created_at: now,
            updated_at: now,
        };
        t.fields.insert(id, field.clone());
        Ok(field)
    }

    async fn update(&self, id: DbId, input: &UpdateField) -> StoreResult<Option<Field>> {
        let mut t = self.lock();
        let Some(current) = t.fields.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            if t.fields.values().any(|f| f.id != id && &f.name == name) {
                return Err(unique("uq_fields_name"));
            }
        }
        let type_name = input.type_name.as_deref().unwrap_or(&current.type_name);
        let parent_id = input.parent_id.unwrap_or(current.parent_id);
        t.check_field_refs(type_name, parent_id)?;

        // project_fields.field_name follows renames (ON UPDATE CASCADE).
        if let Some(name) = &input.name {
            for binding in t.project_fields.values_mut() {
                if binding.field_name == current.name {
                    binding.field_name = name.clone();
                }
            }
        }

        let Some(field) = t.fields.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            field.name = name.clone();
        }
        if let Some(description) = &input.description {
            field.description = Some(description.clone());
        }
        if let Some(type_name) = &input.type_name {
            field.type_name = type_name.clone();
        }
        if let Some(parent_id) = input.parent_id {
            field.parent_id = parent_id;
        }
        if let Some(values) = &input.values {
            field.values = values.clone();
        }
        if let Some(status) = input.status {
            field.status = status;
        }
        if let Some(is_required) = input.is_required {
            field.is_required = is_required;
        }
        field.updated_at = Utc::now();
        let field = field.clone();
        Ok(Some(t.field_with_count(&field)))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        let Some(field) = t.fields.remove(&id) else {
            return Ok(false);
        };
        for child in t.fields.values_mut() {
            if child.parent_id == Some(id) {
                child.parent_id = None;
            }
        }
        t.field_rules
            .retain(|_, r| r.condition_field_id != id && r.target_field_id != id);
        t.project_fields.retain(|_, pf| pf.field_name != field.name);
        Ok(true)
    }
}

#[async_trait]
impl FieldRuleStore for MemoryStore {
    async fn list(&self, filter: &FieldRuleFilter) -> StoreResult<Vec<FieldRule>> {
        let rules = self.lock().rules_where(|r| rule_matches(r, filter));
        Ok(paginate(rules, filter.limit, filter.offset))
    }

    async fn count(&self, filter: &FieldRuleFilter) -> StoreResult<i64> {
        Ok(count_of(
            &self.lock().rules_where(|r| rule_matches(r, filter)),
        ))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<FieldRule>> {
        Ok(self.lock().field_rules.get(&id).cloned())
    }

    async fn list_for_field(&self, field_id: DbId) -> StoreResult<Vec<FieldRule>> {
        Ok(self
            .lock()
            .rules_where(|r| r.condition_field_id == field_id || r.target_field_id == field_id))
    }

    async fn list_for_project(&self, project_id: DbId) -> StoreResult<Vec<FieldRule>> {
        Ok(self
            .lock()
            .rules_where(|r| r.project_id == Some(project_id)))
    }

    async fn create(&self, input: &FieldRuleData) -> StoreResult<FieldRule> {
        let mut t = self.lock();
        t.check_rule_refs(input)?;
        let id = t.next_id("field_rules");
        let now = Utc::now();
        let rule = FieldRule {
            id,
            condition_field_id: input.condition_field_id,
            operator: input.operator,
            condition_value: input.condition_value.clone(),
            action: input.action,
            target_field_id: input.target_field_id,
            project_id: input.project_id,
            created_at: now,
            updated_at: now,
        };
        t.field_rules.insert(id, rule.clone());
        Ok(rule)
    }

    async fn replace(&self, id: DbId, input: &FieldRuleData) -> StoreResult<Option<FieldRule>> {
        let mut t = self.lock();
        if !t.field_rules.contains_key(&id) {
            return Ok(None);
        }
        t.check_rule_refs(input)?;
        let Some(rule) = t.field_rules.get_mut(&id) else {
            return Ok(None);
        };
        rule.condition_field_id = input.condition_field_id;
        rule.operator = input.operator;
        rule.condition_value = input.condition_value.clone();
        rule.action = input.action;
        rule.target_field_id = input.target_field_id;
        rule.project_id = input.project_id;
        rule.updated_at = Utc::now();
        Ok(Some(rule.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.lock().field_rules.remove(&id).is_some())
    }
}

fn rule_matches(rule: &FieldRule, filter: &FieldRuleFilter) -> bool {
    filter
        .project_id
        .is_none_or(|project_id| rule.project_id == Some(project_id))
        && filter.field_id.is_none_or(|field_id| {
            rule.condition_field_id == field_id || rule.target_field_id == field_id
        })
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
        let t = self.lock();
        Ok(paginate(
            t.filtered_projects(filter),
            filter.limit,
            filter.offset,
        ))
    }

    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64> {
        Ok(count_of(&self.lock().filtered_projects(filter)))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.lock().projects.get(&id).cloned())
    }

    async fn create(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut t = self.lock();
        if let Some(owner_id) = input.owner_id {
            if !t.users.contains_key(&owner_id) {
                return Err(foreign_key("fk_projects_owner"));
            }
        }
        let id = t.next_id("projects");
        let now = Utc::now();
        let project = Project {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
            owner_id: input.owner_id,
            created_at: now,
            updated_at: now,
        };
        t.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        let mut t = self.lock();
        let Some(project) = t.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        if let Some(status) = input.status {
            project.status = status;
        }
        if let Some(start_date) = input.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            project.end_date = end_date;
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        if t.projects.remove(&id).is_none() {
            return Ok(false);
        }
        t.project_fields.retain(|_, pf| pf.project_id != id);
        t.field_rules.retain(|_, r| r.project_id != Some(id));
        Ok(true)
    }

    async fn fields(&self, project_id: DbId) -> StoreResult<Vec<ProjectField>> {
        Ok(self.lock().project_fields_of(project_id))
    }

    async fn replace_fields(
        &self,
        project_id: DbId,
        fields: &[CreateProjectField],
    ) -> StoreResult<Vec<ProjectField>> {
        let mut t = self.lock();
        if !t.projects.contains_key(&project_id) {
            return Err(foreign_key("fk_project_fields_project"));
        }
        let mut seen = BTreeSet::new();
        for binding in fields {
            if !t.fields.values().any(|f| f.name == binding.field_name) {
                return Err(foreign_key("fk_project_fields_field"));
            }
            if !seen.insert(binding.field_name.as_str()) {
                return Err(unique("uq_project_fields_project_field"));
            }
        }

        t.project_fields.retain(|_, pf| pf.project_id != project_id);
        let now = Utc::now();
        for binding in fields {
            let id = t.next_id("project_fields");
            t.project_fields.insert(
                id,
                ProjectField {
                    id,
                    project_id,
                    field_name: binding.field_name.clone(),
                    value: binding.value.clone(),
                    is_visible: binding.is_visible,
                    is_required: binding.is_required,
                    display_order: binding.display_order,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        Ok(t.project_fields_of(project_id))
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
