use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::field_type::{CreateFieldTypeInput, FieldTypeListQuery};
use fieldhub_core::types::DbId;
use fieldhub_db::models::field_type::{CreateFieldType, FieldType, FieldTypeFilter};
use fieldhub_db::store::FieldTypeStore;
use fieldhub_db::Stores;

/// The catalogue of types a field can have.
pub struct FieldTypeService {
    field_types: Arc<dyn FieldTypeStore>,
}

impl FieldTypeService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            field_types: stores.field_types.clone(),
        }
    }

    pub async fn list(&self, query: &FieldTypeListQuery) -> Result<Page<FieldType>, CoreError> {
        let request = query.page_request();
        let filter = FieldTypeFilter {
            search: query.search().map(str::to_string),
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.field_types.count(&filter).await?;
        let items = self.field_types.list(&filter).await?;
        Ok(Page::new(items, request, total))
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<FieldType, CoreError> {
        self.field_types
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "FieldType", id })
    }

    pub async fn create(&self, input: CreateFieldTypeInput) -> Result<FieldType, CoreError> {
        if self.field_types.find_by_name(&input.name).await?.is_some() {
            return Err(CoreError::Conflict(
                "A field type with this name already exists".into(),
            ));
        }

        let field_type = self
            .field_types
            .create(&CreateFieldType {
                name: input.name,
                validation: input.validation,
                is_system: input.is_system,
            })
            .await?;

        tracing::info!(field_type_id = field_type.id, name = %field_type.name, "Field type created");
        Ok(field_type)
    }
}
