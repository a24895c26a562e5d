use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Public authentication routes, merged at the root of `/api`.
///
/// ```text
/// POST /auth/login     credentials -> session token
/// POST /auth/logout    acknowledge client-side discard
/// ```
///
/// `GET /auth/session` needs a session and is mounted with the protected
/// routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}
