//! HTTP-level tests for field types, fields and field rules.

mod common;

use axum::http::StatusCode;
use common::{
    admin_session, build_test_app, delete_auth, get_auth, post_json_auth, put_json_auth,
    send_json, TestApp,
};
use serde_json::{json, Value};

async fn create_field(app: &TestApp, token: &str, body: Value) -> Value {
    let (status, json) = send_json(app, post_json_auth("/api/fields", token, body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

async fn text_field(app: &TestApp, token: &str, name: &str) -> i64 {
    create_field(app, token, json!({ "name": name, "type": "text" })).await["id"]
        .as_i64()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

#[tokio::test]
async fn system_field_types_are_seeded() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let (status, json) = send_json(&app, get_auth("/api/field-types", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["meta"]["total"], 7);
    assert!(json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["is_system"] == true));
}

#[tokio::test]
async fn create_field_type_and_conflict() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-types",
            &token,
            json!({ "name": "email", "validation": { "pattern": "^.+@.+$" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["is_system"], false);
    assert_eq!(json["data"]["validation"]["pattern"], "^.+@.+$");
    let id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = send_json(&app, get_auth(&format!("/api/field-types/{id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "email");

    let (status, json) = send_json(
        &app,
        post_json_auth("/api/field-types", &token, json!({ "name": "text" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CONFLICT");

    let (status, json) = send_json(
        &app,
        post_json_auth("/api/field-types", &token, json!({ "name": "has space" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, json) = send_json(&app, get_auth("/api/field-types/999", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "FieldType with id 999 not found");
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_field_dedups_values_and_checks_references() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let field = create_field(
        &app,
        &token,
        json!({
            "name": "Priority",
            "type": "select",
            "values": ["Low", "High", " Low ", "High"],
            "is_required": true,
        }),
    )
    .await;
    assert_eq!(field["type"], "select");
    assert_eq!(field["values"], json!(["Low", "High"]));
    assert_eq!(field["status"], "ACTIVE");
    assert_eq!(field["rule_count"], 0);

    let (status, json) = send_json(
        &app,
        post_json_auth("/api/fields", &token, json!({ "name": "Odd", "type": "colour" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "type: unknown field type 'colour'");

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/fields",
            &token,
            json!({ "name": "Orphan", "type": "text", "parent_id": 999 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Field with id 999 not found");

    let (status, json) = send_json(
        &app,
        post_json_auth("/api/fields", &token, json!({ "name": "Priority", "type": "text" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn parent_cycles_are_rejected() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let root = text_field(&app, &token, "Root").await;
    let child = create_field(
        &app,
        &token,
        json!({ "name": "Child", "type": "text", "parent_id": root }),
    )
    .await["id"]
        .as_i64()
        .unwrap();
    let grandchild = create_field(
        &app,
        &token,
        json!({ "name": "Grandchild", "type": "text", "parent_id": child }),
    )
    .await["id"]
        .as_i64()
        .unwrap();

    let (status, json) = send_json(
        &app,
        put_json_auth(
            &format!("/api/fields/{root}"),
            &token,
            json!({ "parent_id": root }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "parent_id: a field cannot be its own parent");

    let (status, json) = send_json(
        &app,
        put_json_auth(
            &format!("/api/fields/{root}"),
            &token,
            json!({ "parent_id": grandchild }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "parent_id: a field cannot be nested under its own descendant"
    );

    // Explicit null detaches the field from its parent.
    let (status, json) = send_json(
        &app,
        put_json_auth(
            &format!("/api/fields/{grandchild}"),
            &token,
            json!({ "parent_id": null }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["parent_id"].is_null());
}

#[tokio::test]
async fn list_filters_by_type_values_and_rules() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let status_field = create_field(
        &app,
        &token,
        json!({ "name": "Status", "type": "select", "values": ["Open", "Closed"] }),
    )
    .await["id"]
        .as_i64()
        .unwrap();
    let reason = text_field(&app, &token, "Reason").await;
    text_field(&app, &token, "Notes").await;

    send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": status_field,
                "operator": "EQUALS",
                "condition_value": "Closed",
                "action": "SHOW",
                "target_field_id": reason,
            }),
        ),
    )
    .await;

    let names = |json: &Value| -> Vec<String> {
        json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, json) = send_json(&app, get_auth("/api/fields?type=text", &token)).await;
    assert_eq!(names(&json), vec!["Notes", "Reason"]);

    let (_, json) = send_json(&app, get_auth("/api/fields?hasValues=true", &token)).await;
    assert_eq!(names(&json), vec!["Status"]);

    let (_, json) = send_json(&app, get_auth("/api/fields?hasRules=true", &token)).await;
    assert_eq!(names(&json), vec!["Reason", "Status"]);

    let (_, json) = send_json(&app, get_auth("/api/fields?hasRules=false", &token)).await;
    assert_eq!(names(&json), vec!["Notes"]);
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rule_lifecycle_and_field_detail() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let condition = text_field(&app, &token, "Country").await;
    let target = text_field(&app, &token, "State").await;

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": condition,
                "operator": "EQUALS",
                "condition_value": "  US  ",
                "action": "REQUIRE",
                "target_field_id": target,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["condition_value"], "US");
    assert!(json["data"]["project_id"].is_null());
    let rule_id = json["data"]["id"].as_i64().unwrap();
    let rule_uri = format!("/api/field-rules/{rule_id}");

    // Both ends of the rule see it in their detail.
    for field_id in [condition, target] {
        let (_, json) =
            send_json(&app, get_auth(&format!("/api/fields/{field_id}"), &token)).await;
        assert_eq!(json["data"]["rule_count"], 1);
        assert_eq!(json["data"]["rules"][0]["id"], rule_id);
    }

    // Switching to a value-less operator drops the stored value.
    let (status, json) = send_json(
        &app,
        put_json_auth(&rule_uri, &token, json!({ "operator": "IS_EMPTY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["operator"], "IS_EMPTY");
    assert!(json["data"]["condition_value"].is_null());

    // Switching back without supplying a value fails on the merged rule.
    let (status, json) = send_json(
        &app,
        put_json_auth(&rule_uri, &token, json!({ "operator": "CONTAINS" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (_, json) = send_json(
        &app,
        get_auth(&format!("/api/field-rules?fieldId={target}"), &token),
    )
    .await;
    assert_eq!(json["data"]["meta"]["total"], 1);

    let (status, _) = send_json(&app, delete_auth(&rule_uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = send_json(&app, get_auth(&rule_uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], format!("FieldRule with id {rule_id} not found"));
}

#[tokio::test]
async fn rule_shape_and_references_are_checked() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let field = text_field(&app, &token, "Country").await;
    let other = text_field(&app, &token, "State").await;

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": field,
                "operator": "IS_NOT_EMPTY",
                "action": "SHOW",
                "target_field_id": field,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "condition and target must be different fields");

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": field,
                "operator": "EQUALS",
                "action": "SHOW",
                "target_field_id": other,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "operator EQUALS requires a condition_value");

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": 999,
                "operator": "IS_EMPTY",
                "action": "HIDE",
                "target_field_id": other,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Field with id 999 not found");

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": field,
                "operator": "IS_EMPTY",
                "action": "HIDE",
                "target_field_id": other,
                "project_id": 999,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Project with id 999 not found");

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": field,
                "operator": "LIKE",
                "action": "HIDE",
                "target_field_id": other,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn deleting_a_field_removes_its_rules_and_detaches_children() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let parent = text_field(&app, &token, "Address").await;
    let child = create_field(
        &app,
        &token,
        json!({ "name": "City", "type": "text", "parent_id": parent }),
    )
    .await["id"]
        .as_i64()
        .unwrap();

    let (_, json) = send_json(
        &app,
        post_json_auth(
            "/api/field-rules",
            &token,
            json!({
                "condition_field_id": parent,
                "operator": "IS_NOT_EMPTY",
                "action": "SHOW",
                "target_field_id": child,
            }),
        ),
    )
    .await;
    let rule_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) =
        send_json(&app, delete_auth(&format!("/api/fields/{parent}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["message"], "Field deleted");

    let (status, _) =
        send_json(&app, get_auth(&format!("/api/field-rules/{rule_id}"), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send_json(&app, get_auth(&format!("/api/fields/{child}"), &token)).await;
    assert!(json["data"]["parent_id"].is_null());
    assert_eq!(json["data"]["rule_count"], 0);
}
