use std::collections::HashSet;
use std::sync::Arc;

use fieldhub_core::error::CoreError;
use fieldhub_core::pagination::Page;
use fieldhub_core::schemas::project::{
    CreateProjectInput, ProjectListQuery, SetProjectFieldsInput, UpdateProjectInput,
};
use fieldhub_core::types::DbId;
use fieldhub_core::validation::check_date_range;
use fieldhub_db::models::project::{
    CreateProject, CreateProjectField, Project, ProjectDetail, ProjectField, ProjectFilter,
    UpdateProject,
};
use fieldhub_db::store::{FieldRuleStore, FieldStore, ProjectStore};
use fieldhub_db::Stores;

use super::validation_message;

/// Projects and the fields bound to them.
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    fields: Arc<dyn FieldStore>,
    field_rules: Arc<dyn FieldRuleStore>,
}

impl ProjectService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            projects: stores.projects.clone(),
            fields: stores.fields.clone(),
            field_rules: stores.field_rules.clone(),
        }
    }

    pub async fn list(&self, query: &ProjectListQuery) -> Result<Page<Project>, CoreError> {
        let request = query.page_request();
        let filter = ProjectFilter {
            search: query.search().map(str::to_string),
            status: query.status,
            limit: request.limit,
            offset: request.offset(),
        };

        let total = self.projects.count(&filter).await?;
        let items = self.projects.list(&filter).await?;
        Ok(Page::new(items, request, total))
    }

    /// The project with its field bindings and project-scoped rules.
    pub async fn get_by_id(&self, id: DbId) -> Result<ProjectDetail, CoreError> {
        let project = self.find(id).await?;
        let fields = self.projects.fields(id).await?;
        let rules = self.field_rules.list_for_project(id).await?;
        Ok(ProjectDetail {
            project,
            fields,
            rules,
        })
    }

    pub async fn create(
        &self,
        input: CreateProjectInput,
        owner_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = self
            .projects
            .create(&CreateProject {
                name: input.name.trim().to_string(),
                description: input.description,
                status: input.status,
                start_date: input.start_date,
                end_date: input.end_date,
                owner_id: Some(owner_id),
            })
            .await?;

        tracing::info!(project_id = project.id, owner_id, "Project created");
        Ok(project)
    }

    pub async fn update(&self, id: DbId, input: UpdateProjectInput) -> Result<Project, CoreError> {
        let existing = self.find(id).await?;

        // A patch touching one date must still agree with the stored other.
        let start_date = input.start_date.unwrap_or(existing.start_date);
        let end_date = input.end_date.unwrap_or(existing.end_date);
        check_date_range(start_date, end_date)
            .map_err(|e| CoreError::Validation(validation_message(e)))?;

        let project = self
            .projects
            .update(
                id,
                &UpdateProject {
                    name: input.name.map(|n| n.trim().to_string()),
                    description: input.description,
                    status: input.status,
                    start_date: input.start_date,
                    end_date: input.end_date,
                },
            )
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id })?;

        tracing::info!(project_id = id, "Project updated");
        Ok(project)
    }

    /// Delete the project with its field bindings and scoped rules.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.projects.delete(id).await? {
            return Err(CoreError::NotFound { entity: "Project", id });
        }
        tracing::info!(project_id = id, "Project deleted");
        Ok(())
    }

    pub async fn fields(&self, project_id: DbId) -> Result<Vec<ProjectField>, CoreError> {
        self.find(project_id).await?;
        Ok(self.projects.fields(project_id).await?)
    }

    /// Replace every field binding of the project.
    pub async fn set_fields(
        &self,
        project_id: DbId,
        input: SetProjectFieldsInput,
    ) -> Result<Vec<ProjectField>, CoreError> {
        self.find(project_id).await?;

        let bindings: Vec<CreateProjectField> = input
            .fields
            .into_iter()
            .map(|f| CreateProjectField {
                field_name: f.field_name.trim().to_string(),
                value: f.value,
                is_visible: f.is_visible,
                is_required: f.is_required,
                display_order: f.display_order,
            })
            .collect();
        let mut seen = HashSet::new();
        if let Some(dup) = bindings.iter().find(|b| !seen.insert(b.field_name.as_str())) {
            return Err(CoreError::Validation(format!(
                "fields: duplicate field_name '{}'",
                dup.field_name
            )));
        }

        let names: Vec<String> = bindings.iter().map(|b| b.field_name.clone()).collect();
        let known: HashSet<String> = self
            .fields
            .find_by_names(&names)
            .await?
            .into_iter()
            .map(|f| f.name)
            .collect();
        if let Some(missing) = names.iter().find(|n| !known.contains(*n)) {
            return Err(CoreError::Validation(format!(
                "fields: unknown field '{missing}'"
            )));
        }

        let fields = self.projects.replace_fields(project_id, &bindings).await?;
        tracing::info!(project_id, count = fields.len(), "Project fields replaced");
        Ok(fields)
    }

    async fn find(&self, id: DbId) -> Result<Project, CoreError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id })
    }
}
