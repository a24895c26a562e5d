use std::collections::HashSet;
use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field::{
    dedup_values, CreateFieldInput, FieldListQuery, UpdateFieldInput,
};
use fieldhub_core::types::DbId;
use fieldhub_db::models::field::{CreateField, Field, FieldDetail, FieldFilter, UpdateField};
use fieldhub_db::store::{FieldRuleStore, FieldStore, FieldTypeStore};
use fieldhub_db::Stores;

const NAME_TAKEN: &str = "A field with this name already exists";

/// Field definitions, their hierarchy and allowed values.
pub struct FieldService {
    fields: Arc<dyn FieldStore>,
    field_types: Arc<dyn FieldTypeStore>,
    field_rules: Arc<dyn FieldRuleStore>,
}

impl FieldService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            fields: stores.fields.clone(),
            field_types: stores.field_types.clone(),
            field_rules: stores.field_rules.clone(),
        }
    }

    pub async fn list(&self, query: &FieldListQuery) -> Result<Page<Field>, CoreError> {
        let request = query.page_request();
        let filter = FieldFilter {
            search: query.search().map(str::to_string),
            status: query.status,
            type_name: query.type_name.clone(),
            has_rules: query.has_rules,
            has_values: query.has_values,
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.fields.count(&filter).await?;
        let items = self.fields.list(&filter).await?;
        Ok(Page::new(items, request, total))
    }

    /// The field together with every rule that references it.
    pub async fn get_by_id(&self, id: DbId) -> Result<FieldDetail, CoreError> {
        let field = self.find(id).await?;
        let rules = self.field_rules.list_for_field(id).await?;
        Ok(FieldDetail { field, rules })
    }

    pub async fn create(&self, input: CreateFieldInput) -> Result<Field, CoreError> {
        let name = input.name.trim().to_string();
        if self.fields.find_by_name(&name).await?.is_some() {
            return Err(CoreError::Conflict(NAME_TAKEN.into()));
        }
        self.ensure_type(&input.type_name).await?;
        if let Some(parent_id) = input.parent_id {
            self.find(parent_id).await?;
        }

        let field = self
            .fields
            .create(&CreateField {
                name,
                description: input.description,
                type_name: input.type_name,
                parent_id: input.parent_id,
                values: dedup_values(input.values),
                status: input.status,
                is_required: input.is_required,
            })
            .await?;

        tracing::info!(field_id = field.id, name = %field.name, "Field created");
        Ok(field)
    }

    pub async fn update(&self, id: DbId, input: UpdateFieldInput) -> Result<Field, CoreError> {
        let existing = self.find(id).await?;

        let name = input.name.map(|n| n.trim().to_string());
        if let Some(name) = name.as_deref().filter(|n| *n != existing.name) {
            if let Some(other) = self.fields.find_by_name(name).await? {
                if other.id != id {
                    return Err(CoreError::Conflict(NAME_TAKEN.into()));
                }
            }
        }
        if let Some(type_name) = &input.type_name {
            self.ensure_type(type_name).await?;
        }
        if let Some(Some(parent_id)) = input.parent_id {
            self.check_parent(id, parent_id).await?;
        }

        let field = self
            .fields
            .update(
                id,
                &UpdateField {
                    name,
                    description: input.description,
                    type_name: input.type_name,
                    parent_id: input.parent_id,
                    values: input.values.map(dedup_values),
                    status: input.status,
                    is_required: input.is_required,
                },
            )
            .await?
            .ok_or(CoreError::NotFound { entity: "Field", id })?;

        tracing::info!(field_id = id, "Field updated");
        Ok(field)
    }

    /// Delete a field. Children are detached; rules and project bindings
    /// referencing it go with it.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.fields.delete(id).await? {
            return Err(CoreError::NotFound { entity: "Field", id });
        }
        tracing::info!(field_id = id, "Field deleted");
        Ok(())
    }

    async fn find(&self, id: DbId) -> Result<Field, CoreError> {
        self.fields
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Field", id })
    }

    async fn ensure_type(&self, type_name: &str) -> Result<(), CoreError> {
        match self.field_types.find_by_name(type_name).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::Validation(format!(
                "type: unknown field type '{type_name}'"
            ))),
        }
    }

    /// `parent_id` must exist and must not be `id` or one of its descendants.
    async fn check_parent(&self, id: DbId, parent_id: DbId) -> Result<(), CoreError> {
        if parent_id == id {
            return Err(CoreError::Validation(
                "parent_id: a field cannot be its own parent".into(),
            ));
        }

        let mut visited = HashSet::new();
        let mut current = Some(self.find(parent_id).await?);
        while let Some(ancestor) = current {
            if ancestor.id == id {
                return Err(CoreError::Validation(
                    "parent_id: a field cannot be nested under its own descendant".into(),
                ));
            }
            if !visited.insert(ancestor.id) {
                break;
            }
            current = match ancestor.parent_id {
                Some(next) => self.fields.find_by_id(next).await?,
                None => None,
            };
        }
        Ok(())
    }
}
