use axum::routing::get;
use axum::Router;

use crate::handlers::debug;
use crate::state::AppState;

/// Unauthenticated listings mounted at `/test` in development only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(debug::list_users))
        .route("/roles", get(debug::list_roles))
}
