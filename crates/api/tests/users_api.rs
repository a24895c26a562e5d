//! HTTP-level tests for the `/api/users` resource.

mod common;

use axum::http::StatusCode;
use common::{
    admin_session, build_test_app, create_user, delete_auth, get_auth, post_json_auth,
    put_json_auth, send_json, TestApp, ADMIN_ROLE_ID, TEST_PASSWORD, USER_ROLE_ID,
};
use fieldhub_core::pagination::MAX_PAGE;
use fieldhub_db::models::user::UserFilter;

async fn user_count(app: &TestApp) -> i64 {
    app.stores
        .users
        .count(&UserFilter {
            search: None,
            status: None,
            role_id: None,
            limit: 100,
            offset: 0,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn create_then_get_returns_the_same_user() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let (status, created) = send_json(
        &app,
        post_json_auth(
            "/api/users",
            &token,
            serde_json::json!({
                "email": "Grace@Example.com",
                "password": TEST_PASSWORD,
                "name": "Grace",
                "role_ids": [USER_ROLE_ID],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    let user = &created["data"];
    assert_eq!(user["email"], "grace@example.com");
    assert_eq!(user["status"], "ACTIVE");
    assert_eq!(user["roles"][0]["id"], USER_ROLE_ID);
    assert!(user.get("password_hash").is_none());

    let id = user["id"].as_i64().unwrap();
    let (status, fetched) = send_json(&app, get_auth(&format!("/api/users/{id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&fetched["data"], user);

    // The new account can log in with the password it was created with.
    common::login(&app, "grace@example.com", TEST_PASSWORD).await;
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_and_adds_no_row() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    create_user(&app.stores, "grace@example.com", "Grace", vec![]).await;
    let before = user_count(&app).await;

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/users",
            &token,
            serde_json::json!({
                "email": "GRACE@example.com",
                "password": TEST_PASSWORD,
                "name": "Another Grace",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "A user with this email already exists");
    assert_eq!(user_count(&app).await, before);
}

#[tokio::test]
async fn invalid_and_malformed_bodies_are_rejected() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/users",
            &token,
            serde_json::json!({ "email": "nope", "password": "short", "name": "N" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("email"));
    assert!(message.contains("password: length must be between 8 and 128"));

    let (status, json) = send_json(
        &app,
        post_json_auth("/api/users", &token, serde_json::json!({ "email": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) = send_json(&app, get_auth("/api/users/abc", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn second_page_of_twenty_five() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    for i in 1..=25 {
        create_user(
            &app.stores,
            &format!("member{i:02}@example.com"),
            &format!("Member {i:02}"),
            vec![],
        )
        .await;
    }

    let (status, json) = send_json(
        &app,
        get_auth("/api/users?search=member&page=2&limit=10", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (11..=20).map(|i| format!("Member {i:02}")).collect();
    assert_eq!(names, expected);
    assert_eq!(json["data"]["meta"]["total"], 25);
    assert_eq!(json["data"]["meta"]["total_pages"], 3);
    assert_eq!(json["data"]["meta"]["page"], 2);
}

#[tokio::test]
async fn limit_above_maximum_is_rejected() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let (status, json) = send_json(&app, get_auth("/api/users?limit=101", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn huge_page_numbers_never_overflow() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;

    let uri = format!("/api/users?page={}&limit=100", i64::MAX);
    let (status, json) = send_json(&app, get_auth(&uri, &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().starts_with("page: "));

    // The largest accepted page is simply past the end.
    let uri = format!("/api/users?page={MAX_PAGE}&limit=100");
    let (status, json) = send_json(&app, get_auth(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["meta"]["page"], MAX_PAGE);
    assert_eq!(json["data"]["meta"]["total"], 1);
}

#[tokio::test]
async fn filters_by_status_and_role() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    create_user(&app.stores, "grace@example.com", "Grace", vec![USER_ROLE_ID]).await;
    let linus = create_user(&app.stores, "linus@example.com", "Linus", vec![]).await;
    send_json(
        &app,
        put_json_auth(
            &format!("/api/users/{}", linus.id),
            &token,
            serde_json::json!({ "status": "INACTIVE" }),
        ),
    )
    .await;

    let (_, json) = send_json(&app, get_auth("/api/users?roleId=2", &token)).await;
    assert_eq!(json["data"]["meta"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["name"], "Grace");

    let (_, json) = send_json(&app, get_auth("/api/users?status=inactive", &token)).await;
    assert_eq!(json["data"]["meta"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["name"], "Linus");
}

#[tokio::test]
async fn update_replaces_roles_and_rejects_unknown_role() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let grace = create_user(&app.stores, "grace@example.com", "Grace", vec![USER_ROLE_ID]).await;
    let uri = format!("/api/users/{}", grace.id);

    let (status, json) = send_json(
        &app,
        put_json_auth(
            &uri,
            &token,
            serde_json::json!({ "name": "Grace H.", "role_ids": [ADMIN_ROLE_ID] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Grace H.");
    assert_eq!(json["data"]["roles"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["roles"][0]["name"], "Admin");

    let (status, json) = send_json(
        &app,
        put_json_auth(&uri, &token, serde_json::json!({ "role_ids": [999] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Role with id 999 not found");
}

#[tokio::test]
async fn update_to_taken_email_conflicts() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let grace = create_user(&app.stores, "grace@example.com", "Grace", vec![]).await;

    let (status, json) = send_json(
        &app,
        put_json_auth(
            &format!("/api/users/{}", grace.id),
            &token,
            serde_json::json!({ "email": "admin@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CONFLICT");

    // Re-submitting the user's own email is not a conflict.
    let (status, _) = send_json(
        &app,
        put_json_auth(
            &format!("/api/users/{}", grace.id),
            &token,
            serde_json::json!({ "email": "Grace@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn manage_roles_add_remove_replace() {
    let app = build_test_app();
    let (_, token) = admin_session(&app).await;
    let editor = send_json(
        &app,
        post_json_auth("/api/roles", &token, serde_json::json!({ "name": "Editor" })),
    )
    .await
    .1["data"]["id"]
        .as_i64()
        .unwrap();
    let grace = create_user(&app.stores, "grace@example.com", "Grace", vec![USER_ROLE_ID]).await;
    let uri = format!("/api/users/{}/roles", grace.id);

    let role_names = |json: &serde_json::Value| -> Vec<String> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, json) = send_json(
        &app,
        post_json_auth(
            &uri,
            &token,
            serde_json::json!({ "role_ids": [editor, USER_ROLE_ID], "action": "add" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role_names(&json), vec!["Editor", "User"]);

    let (_, json) = send_json(
        &app,
        post_json_auth(
            &uri,
            &token,
            serde_json::json!({ "role_ids": [USER_ROLE_ID, ADMIN_ROLE_ID], "action": "remove" }),
        ),
    )
    .await;
    assert_eq!(role_names(&json), vec!["Editor"]);

    let (_, json) = send_json(
        &app,
        post_json_auth(
            &uri,
            &token,
            serde_json::json!({ "role_ids": [ADMIN_ROLE_ID], "action": "replace" }),
        ),
    )
    .await;
    assert_eq!(role_names(&json), vec!["Admin"]);

    let (_, json) = send_json(&app, get_auth(&uri, &token)).await;
    assert_eq!(role_names(&json), vec!["Admin"]);

    let (status, _) = send_json(
        &app,
        post_json_auth(
            &uri,
            &token,
            serde_json::json!({ "role_ids": [404], "action": "add" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send_json(
        &app,
        post_json_auth(
            "/api/users/9999/roles",
            &token,
            serde_json::json!({ "role_ids": [], "action": "replace" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "User with id 9999 not found");
}

#[tokio::test]
async fn delete_user_but_not_yourself() {
    let app = build_test_app();
    let (admin, token) = admin_session(&app).await;
    let grace = create_user(&app.stores, "grace@example.com", "Grace", vec![]).await;

    let (status, json) =
        send_json(&app, delete_auth(&format!("/api/users/{}", admin.id), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let uri = format!("/api/users/{}", grace.id);
    let (status, _) = send_json(&app, delete_auth(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send_json(&app, get_auth(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, _) = send_json(&app, delete_auth(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
