#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use fieldhub_api::auth::jwt::JwtConfig;
use fieldhub_api::config::{Environment, ServerConfig};
use fieldhub_api::router::build_app_router;
use fieldhub_api::services::UserService;
use fieldhub_api::state::AppState;
use fieldhub_core::schemas::user::CreateUserInput;
use fieldhub_core::status::UserStatus;
use fieldhub_core::types::DbId;
use fieldhub_db::models::user::UserResponse;
use fieldhub_db::Stores;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Id of the seeded `Admin` role.
pub const ADMIN_ROLE_ID: DbId = 1;

/// Id of the seeded `User` role.
pub const USER_ROLE_ID: DbId = 2;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the development environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        environment: Environment::Development,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
        },
        bootstrap_admin: None,
    }
}

/// Router plus the store behind it, so tests can seed and inspect state.
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
}

impl TestApp {
    /// Send one request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

/// Build the full application router over a fresh, seeded in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config(), Stores::in_memory())
}

pub fn build_test_app_with(config: ServerConfig, stores: Stores) -> TestApp {
    let state = AppState::new(stores.clone(), config.clone());
    TestApp {
        router: build_app_router(state, &config),
        stores,
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Create an active user with [`TEST_PASSWORD`] through the service layer.
pub async fn create_user(
    stores: &Stores,
    email: &str,
    name: &str,
    role_ids: Vec<DbId>,
) -> UserResponse {
    UserService::new(stores)
        .create(CreateUserInput {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            name: name.to_string(),
            status: UserStatus::Active,
            role_ids,
        })
        .await
        .expect("user creation should succeed")
}

/// Log in via the API and return the session token.
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .send(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// Create an admin and return `(user, token)`.
pub async fn admin_session(app: &TestApp) -> (UserResponse, String) {
    let admin = create_user(&app.stores, "admin@example.com", "Admin", vec![ADMIN_ROLE_ID]).await;
    let token = login(app, "admin@example.com", TEST_PASSWORD).await;
    (admin, token)
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    json_request(Method::POST, uri, None, body)
}

pub fn post_json_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    json_request(Method::POST, uri, Some(token), body)
}

pub fn put_json_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    json_request(Method::PUT, uri, Some(token), body)
}

pub fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Send a request and return `(status, json body)`.
pub async fn send_json(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.send(request).await;
    let status = response.status();
    (status, body_json(response).await)
}
