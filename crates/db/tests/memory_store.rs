//! Behaviour of the in-memory store: constraint names, cascades, ordering.

use std::sync::Arc;

use assert_matches::assert_matches;
use fieldhub_core::status::{FieldStatus, ProjectStatus, RuleAction, RuleOperator, UserStatus};
use fieldhub_db::memory::MemoryStore;
use fieldhub_db::models::field::{CreateField, FieldFilter, UpdateField};
use fieldhub_db::models::field_rule::{FieldRuleData, FieldRuleFilter};
use fieldhub_db::models::project::{CreateProject, CreateProjectField};
use fieldhub_db::models::role::{CreateRole, RoleDeletion, RoleFilter};
use fieldhub_db::models::user::{CreateUser, UserFilter};
use fieldhub_db::{StoreError, Stores};

fn stores() -> Stores {
    Stores::from_memory(Arc::new(MemoryStore::seeded()))
}

fn new_user(email: &str, name: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        name: name.to_string(),
        status: UserStatus::Active,
        role_ids: Vec::new(),
    }
}

fn new_field(name: &str) -> CreateField {
    CreateField {
        name: name.to_string(),
        description: None,
        type_name: "text".to_string(),
        parent_id: None,
        values: Vec::new(),
        status: FieldStatus::Active,
        is_required: false,
    }
}

fn user_filter(limit: i64, offset: i64) -> UserFilter {
    UserFilter {
        search: None,
        status: None,
        role_id: None,
        limit,
        offset,
    }
}

#[tokio::test]
async fn seeded_store_has_default_roles_and_field_types() {
    let stores = stores();
    let admin = stores.roles.find_by_name("Admin").await.unwrap();
    assert!(admin.is_some());
    assert!(stores.field_types.find_by_name("multi_select").await.unwrap().is_some());
}

#[tokio::test]
async fn duplicate_email_reports_unique_constraint() {
    let stores = stores();
    stores.users.create(&new_user("a@x.io", "A")).await.unwrap();
    let err = stores
        .users
        .create(&new_user("a@x.io", "Other"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::UniqueViolation(c) if c == "uq_users_email");
    assert_eq!(stores.users.count(&user_filter(10, 0)).await.unwrap(), 1);
}

#[tokio::test]
async fn users_are_ordered_by_name_and_paginated() {
    let stores = stores();
    for i in 1..=25 {
        stores
            .users
            .create(&new_user(&format!("u{i:02}@x.io"), &format!("User {i:02}")))
            .await
            .unwrap();
    }
    let page = stores.users.list(&user_filter(10, 10)).await.unwrap();
    let names: Vec<&str> = page.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"User 11"));
    assert_eq!(names.last(), Some(&"User 20"));
    assert_eq!(stores.users.count(&user_filter(10, 10)).await.unwrap(), 25);
}

#[tokio::test]
async fn search_is_case_insensitive_and_literal() {
    let stores = stores();
    stores.users.create(&new_user("ada@x.io", "Ada Lovelace")).await.unwrap();
    stores.users.create(&new_user("bob@x.io", "Bob 100%")).await.unwrap();

    let mut filter = user_filter(10, 0);
    filter.search = Some("LOVE".into());
    assert_eq!(stores.users.count(&filter).await.unwrap(), 1);

    filter.search = Some("%".into());
    let found = stores.users.list(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Bob 100%");
}

#[tokio::test]
async fn role_in_use_cannot_be_deleted() {
    let stores = stores();
    let role = stores
        .roles
        .create(&CreateRole {
            name: "Editor".into(),
            description: None,
            color: "#123456".into(),
            permissions: vec!["b".into(), "a".into(), "a".into()],
        })
        .await
        .unwrap();
    assert_eq!(role.permissions, vec!["a".to_string(), "b".to_string()]);

    let mut input = new_user("e@x.io", "E");
    input.role_ids = vec![role.id];
    let user = stores.users.create(&input).await.unwrap();

    assert_eq!(
        stores.roles.delete_unassigned(role.id).await.unwrap(),
        RoleDeletion::InUse { user_count: 1 }
    );

    stores.users.remove_roles(user.id, &[role.id]).await.unwrap();
    assert_eq!(
        stores.roles.delete_unassigned(role.id).await.unwrap(),
        RoleDeletion::Deleted
    );
    assert_eq!(
        stores.roles.delete_unassigned(role.id).await.unwrap(),
        RoleDeletion::NotFound
    );
}

#[tokio::test]
async fn role_counts_follow_assignments() {
    let stores = stores();
    let admin = stores.roles.find_by_name("Admin").await.unwrap().unwrap();
    let user = stores.users.create(&new_user("c@x.io", "C")).await.unwrap();

    stores.users.add_roles(user.id, &[admin.id]).await.unwrap();
    stores.users.add_roles(user.id, &[admin.id]).await.unwrap();
    let roles = stores
        .roles
        .list(&RoleFilter {
            search: Some("adm".into()),
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].user_count, 1);

    let err = stores.users.add_roles(user.id, &[9999]).await.unwrap_err();
    assert_matches!(err, StoreError::ForeignKeyViolation(_));
}

#[tokio::test]
async fn deleting_a_field_cascades_and_orphans_children() {
    let stores = stores();
    let parent = stores.fields.create(&new_field("region")).await.unwrap();
    let mut child_input = new_field("country");
    child_input.parent_id = Some(parent.id);
    let child = stores.fields.create(&child_input).await.unwrap();

    let project = stores
        .projects
        .create(&CreateProject {
            name: "Atlas".into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            owner_id: None,
        })
        .await
        .unwrap();
    stores
        .projects
        .replace_fields(
            project.id,
            &[CreateProjectField {
                field_name: "region".into(),
                value: None,
                is_visible: true,
                is_required: false,
                display_order: 0,
            }],
        )
        .await
        .unwrap();
    stores
        .field_rules
        .create(&FieldRuleData {
            condition_field_id: parent.id,
            operator: RuleOperator::IsNotEmpty,
            condition_value: None,
            action: RuleAction::Show,
            target_field_id: child.id,
            project_id: None,
        })
        .await
        .unwrap();
    assert_eq!(
        stores.fields.find_by_id(parent.id).await.unwrap().unwrap().rule_count,
        1
    );

    assert!(stores.fields.delete(parent.id).await.unwrap());

    let child = stores.fields.find_by_id(child.id).await.unwrap().unwrap();
    assert_eq!(child.parent_id, None);
    assert_eq!(child.rule_count, 0);
    let filter = FieldRuleFilter {
        limit: 10,
        ..Default::default()
    };
    assert_eq!(stores.field_rules.count(&filter).await.unwrap(), 0);
    assert!(stores.projects.fields(project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn renaming_a_field_updates_project_bindings() {
    let stores = stores();
    let field = stores.fields.create(&new_field("budget")).await.unwrap();
    let project = stores
        .projects
        .create(&CreateProject {
            name: "Hermes".into(),
            description: None,
            status: ProjectStatus::Active,
            start_date: None,
            end_date: None,
            owner_id: None,
        })
        .await
        .unwrap();
    stores
        .projects
        .replace_fields(
            project.id,
            &[CreateProjectField {
                field_name: "budget".into(),
                value: Some("100".into()),
                is_visible: true,
                is_required: true,
                display_order: 1,
            }],
        )
        .await
        .unwrap();

    stores
        .fields
        .update(
            field.id,
            &UpdateField {
                name: Some("cost".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let bindings = stores.projects.fields(project.id).await.unwrap();
    assert_eq!(bindings[0].field_name, "cost");
}

#[tokio::test]
async fn duplicate_project_bindings_are_rejected_atomically() {
    let stores = stores();
    stores.fields.create(&new_field("owner")).await.unwrap();
    let project = stores
        .projects
        .create(&CreateProject {
            name: "Io".into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let binding = CreateProjectField {
        field_name: "owner".into(),
        value: None,
        is_visible: true,
        is_required: false,
        display_order: 0,
    };
    stores
        .projects
        .replace_fields(project.id, std::slice::from_ref(&binding))
        .await
        .unwrap();

    let err = stores
        .projects
        .replace_fields(project.id, &[binding.clone(), binding])
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::UniqueViolation(c) if c == "uq_project_fields_project_field");
    assert_eq!(stores.projects.fields(project.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn field_filters_on_rules_and_values() {
    let stores = stores();
    let mut with_values = new_field("priority");
    with_values.values = vec!["low".into(), "high".into()];
    let a = stores.fields.create(&with_values).await.unwrap();
    let b = stores.fields.create(&new_field("notes")).await.unwrap();
    stores.fields.create(&new_field("summary")).await.unwrap();
    stores
        .field_rules
        .create(&FieldRuleData {
            condition_field_id: a.id,
            operator: RuleOperator::Equals,
            condition_value: Some("high".into()),
            action: RuleAction::Require,
            target_field_id: b.id,
            project_id: None,
        })
        .await
        .unwrap();

    let base = FieldFilter {
        limit: 10,
        ..Default::default()
    };
    let has_values = FieldFilter {
        has_values: Some(true),
        ..base.clone()
    };
    let names: Vec<String> = stores
        .fields
        .list(&has_values)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["priority"]);

    let without_rules = FieldFilter {
        has_rules: Some(false),
        ..base
    };
    let names: Vec<String> = stores
        .fields
        .list(&without_rules)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["summary"]);
}

#[tokio::test]
async fn deleting_a_user_nulls_project_owner() {
    let stores = stores();
    let user = stores.users.create(&new_user("o@x.io", "Owner")).await.unwrap();
    let project = stores
        .projects
        .create(&CreateProject {
            name: "Owned".into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            owner_id: Some(user.id),
        })
        .await
        .unwrap();

    assert!(stores.users.delete(user.id).await.unwrap());
    let project = stores.projects.find_by_id(project.id).await.unwrap().unwrap();
    assert_eq!(project.owner_id, None);
}
